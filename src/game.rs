//! Game state machine: lives, score, game over, and the session best.
use crate::countries::CountryRecord;
use crate::round::{next_round, Round};
use rand::Rng;
use std::rc::Rc;

/// Wrong answers that end a game
pub const MAX_WRONG_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Presentation hint derived from the game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Cheerful,
    /// One life left
    Danger,
    /// The finished game scored below the session best
    Gloomy,
}

/// Counters for the current game plus the session best
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameState {
    pub correct_attempts: u32,
    pub wrong_attempts: u32,
    pub game_over: bool,
    pub best_score: u32,
}

/// What a single answer did to the state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub ended_game: bool,
    pub new_best: bool,
}

impl GameState {
    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            Phase::Playing
        }
    }

    pub fn lives_left(&self) -> u32 {
        MAX_WRONG_ATTEMPTS.saturating_sub(self.wrong_attempts)
    }

    /// Remaining lives as a fraction of the starting lives, for progress bars
    pub fn lives_fraction(&self) -> f64 {
        self.lives_left() as f64 / MAX_WRONG_ATTEMPTS as f64
    }

    pub fn mood(&self) -> Mood {
        match self.phase() {
            Phase::GameOver if self.correct_attempts < self.best_score => Mood::Gloomy,
            Phase::GameOver => Mood::Cheerful,
            Phase::Playing if self.lives_left() == 1 => Mood::Danger,
            Phase::Playing => Mood::Cheerful,
        }
    }

    /// Applies one answer. Ignored once the game is over.
    pub fn record_answer(&mut self, correct: bool) -> Transition {
        if self.game_over {
            return Transition::default();
        }

        if correct {
            self.correct_attempts += 1;
        } else {
            self.wrong_attempts += 1;
        }

        if self.wrong_attempts < MAX_WRONG_ATTEMPTS {
            return Transition::default();
        }

        self.game_over = true;
        let new_best = self.correct_attempts > self.best_score;
        if new_best {
            self.best_score = self.correct_attempts;
        }
        Transition {
            ended_game: true,
            new_best,
        }
    }

    /// Starts a fresh game; the best score carries over.
    pub fn reset(&mut self) {
        self.correct_attempts = 0;
        self.wrong_attempts = 0;
        self.game_over = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong { correct_capital: String },
}

/// Feedback for a submitted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    pub game_over: bool,
    pub new_best: bool,
    /// Score of the game that just ended, when it ended
    pub final_score: Option<u32>,
}

/// Everything one player session owns.
///
/// The country list is fetched once and shared read-only by every round.
pub struct GameSession<R> {
    countries: Rc<[CountryRecord]>,
    state: GameState,
    round: Option<Round>,
    rng: R,
    games_finished: u32,
}

impl<R: Rng> GameSession<R> {
    pub fn new(countries: impl Into<Rc<[CountryRecord]>>, rng: R) -> Self {
        let mut session = Self {
            countries: countries.into(),
            state: GameState::default(),
            round: None,
            rng,
            games_finished: 0,
        };
        session.round = session.generate_round();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current question, absent when no round could be generated
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn games_finished(&self) -> u32 {
        self.games_finished
    }

    /// Answers the current round.
    ///
    /// Returns `None` without touching the state when the game is over or
    /// there is no round to answer.
    pub fn submit(&mut self, answer: &str) -> Option<Outcome> {
        if self.state.game_over {
            return None;
        }
        let round = self.round.as_ref()?;

        let correct = round.is_correct(answer);
        let verdict = if correct {
            Verdict::Correct
        } else {
            Verdict::Wrong {
                correct_capital: round.correct_capital.clone(),
            }
        };

        let transition = self.state.record_answer(correct);
        let mut final_score = None;
        if transition.ended_game {
            self.games_finished += 1;
            final_score = Some(self.state.correct_attempts);
            tracing::info!(
                score = self.state.correct_attempts,
                best = self.state.best_score,
                new_best = transition.new_best,
                "Game over"
            );
        } else {
            self.round = self.generate_round();
        }

        Some(Outcome {
            verdict,
            game_over: transition.ended_game,
            new_best: transition.new_best,
            final_score,
        })
    }

    /// Starts a new game with a new round.
    pub fn reset(&mut self) {
        self.state.reset();
        self.round = self.generate_round();
    }

    fn generate_round(&mut self) -> Option<Round> {
        match next_round(&self.countries, &mut self.rng) {
            Ok(round) => {
                tracing::debug!(country = %round.country, "New round");
                Some(round)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot generate a round");
                None
            }
        }
    }
}
