//! Text screens for the terminal front-end.
//!
//! Everything here is a pure function of the session state, called after each
//! transition.
use crate::game::{GameState, Mood, Outcome, Phase, Verdict, MAX_WRONG_ATTEMPTS};
use crate::round::Round;

const BAR_WIDTH: usize = 12;

/// Lives left as a bar, e.g. `[########----] 2/3`
pub fn lives_bar(state: &GameState) -> String {
    let filled = (state.lives_fraction() * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        state.lives_left(),
        MAX_WRONG_ATTEMPTS
    )
}

/// Full screen for the current state.
pub fn render_screen(state: &GameState, round: Option<&Round>, flag_url: Option<&str>) -> String {
    let mut lines: Vec<String> = Vec::new();

    match (state.phase(), round) {
        (Phase::GameOver, _) => {
            lines.push("=== GAME OVER! ===".to_string());
            if state.mood() == Mood::Gloomy {
                lines.push("(Below your best this time.)".to_string());
            }
            lines.push(format!("Total correct answers: {}", state.correct_attempts));
            lines.push(format!("Best score: {}", state.best_score));
            lines.push("Time to study!".to_string());
            lines.push("Type 'again' to play again.".to_string());
        }
        (Phase::Playing, None) => {
            lines.push("(No country data available, no round to play.)".to_string());
        }
        (Phase::Playing, Some(round)) => {
            lines.push(format!("Country: {}", round.country));
            if let Some(url) = flag_url {
                lines.push(format!("Flag: {url}"));
            }
            lines.push("What is its capital?".to_string());
            for (i, option) in round.options.iter().enumerate() {
                lines.push(format!("  {}) {}", i + 1, option));
            }
            lines.push(format!("Correct attempts: {}", state.correct_attempts));
            lines.push(format!("Lives left: {}", lives_bar(state)));
            if state.mood() == Mood::Danger {
                lines.push("!!! Last life, careful !!!".to_string());
            }
        }
    }

    lines.push(format!("Best score: {}", state.best_score));
    lines.join("\n")
}

/// Immediate feedback after an answer.
pub fn render_outcome(outcome: &Outcome) -> String {
    let mut lines = vec![match &outcome.verdict {
        Verdict::Correct => "Correct!".to_string(),
        Verdict::Wrong { correct_capital } => {
            format!("Wrong! The answer was {correct_capital}.")
        }
    }];

    if outcome.new_best {
        if let Some(score) = outcome.final_score {
            lines.push(format!("*** New best score: {score}! ***"));
        }
    }
    lines.join("\n")
}

/// Session totals, shown by `score` and on exit.
pub fn render_summary(state: &GameState, games_finished: u32) -> String {
    [
        "=== SESSION SUMMARY ===".to_string(),
        format!("Games finished: {games_finished}"),
        format!("Best score: {}", state.best_score),
        format!("Current game: {} correct, {} wrong", state.correct_attempts, state.wrong_attempts),
    ]
    .join("\n")
}
