mod config;
mod countries;
mod flags;
mod game;
mod render;
mod round;

use crate::config::{load_settings, Args, DataSource};
use crate::countries::{fetch_all, CountrySource, FileSource, HttpSource};
use crate::game::{GameSession, Phase};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_help() {
    println!("Commands:");
    println!("  1-4 or a capital -> answer the current question");
    println!("  again            -> play again after a game over");
    println!("  score            -> show session score");
    println!("  help             -> show this list");
    println!("  quit             -> exit");
    println!();
}

fn show(session: &GameSession<StdRng>, flag_base_url: &str) {
    let flag = session
        .round()
        .and_then(|r| flags::flag_url(flag_base_url, r.country_code.as_deref()));
    println!("{}", render::render_screen(session.state(), session.round(), flag.as_deref()));
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings(&args)?;

    let source: Box<dyn CountrySource> = match &settings.source {
        DataSource::Http { url, timeout } => Box::new(HttpSource::new(url, *timeout)),
        DataSource::File(path) => Box::new(FileSource::new(path.clone())),
    };
    let countries = fetch_all(source.as_ref());

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = GameSession::new(countries, rng);

    println!("Welcome to Guess the Capital!");
    println!("Guess the capital of the randomly selected country. You have 3 lives!");
    print_help();
    show(&session, &settings.flag_base_url);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().ok();

        let raw = match lines.next() {
            Some(Ok(line)) => line.trim().to_string(),
            Some(Err(_)) => {
                eprintln!("Error reading input, try again.");
                continue;
            }
            None => break,
        };
        if raw.is_empty() {
            continue;
        }

        match raw.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "score" => {
                println!("{}", render::render_summary(session.state(), session.games_finished()));
                println!();
            }
            "help" => print_help(),
            "again" | "play again" => {
                if session.state().phase() == Phase::GameOver {
                    session.reset();
                    show(&session, &settings.flag_base_url);
                } else {
                    println!("The game is still running.\n");
                }
            }
            _ => {
                if session.state().phase() == Phase::GameOver {
                    println!("Game over. Type 'again' to play again.\n");
                    continue;
                }

                let answer = session
                    .round()
                    .and_then(|r| r.resolve_answer(&raw))
                    .map(str::to_string);

                let Some(answer) = answer else {
                    if session.round().is_none() {
                        println!("No round available.\n");
                    } else {
                        println!("Pick 1-4 or type one of the capitals shown.\n");
                    }
                    continue;
                };

                if let Some(outcome) = session.submit(&answer) {
                    println!("{}", render::render_outcome(&outcome));
                    if outcome.game_over {
                        println!();
                    }
                    show(&session, &settings.flag_base_url);
                }
            }
        }
    }

    println!("\n{}", render::render_summary(session.state(), session.games_finished()));
    println!("Goodbye!");
    Ok(())
}
