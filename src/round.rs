//! Quiz round generation: one target country plus four shuffled capitals.
use crate::countries::CountryRecord;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

/// Shown as the answer when the target country has no capital on record
pub const UNKNOWN_CAPITAL: &str = "Unknown";

/// Options presented per round, correct answer included
pub const OPTION_COUNT: usize = 4;

/// Random draws allowed while collecting distractors
pub const MAX_SAMPLE_DRAWS: usize = 256;

/// A single question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub country: String,
    /// Two-letter code of the target country, when known
    pub country_code: Option<String>,
    pub correct_capital: String,
    pub options: Vec<String>,
}

impl Round {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_capital
    }

    /// Maps player input onto one of the presented options.
    ///
    /// Accepts the option number ("1".."4") or the option text, ignoring case.
    pub fn resolve_answer(&self, input: &str) -> Option<&str> {
        let raw = input.trim();
        if raw.is_empty() {
            return None;
        }

        if raw.bytes().all(|b| b.is_ascii_digit()) {
            let n = raw.parse::<usize>().ok()?;
            return n
                .checked_sub(1)
                .and_then(|i| self.options.get(i))
                .map(String::as_str);
        }

        let lc = raw.to_lowercase();
        self.options
            .iter()
            .find(|o| o.to_lowercase() == lc)
            .map(String::as_str)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("No countries to ask about")]
    EmptyCountryList,

    #[error("Need {needed} other distinct capitals for a round, only {found} available")]
    NotEnoughCapitals { needed: usize, found: usize },
}

fn capital_of(country: &CountryRecord) -> &str {
    country.capital.as_deref().unwrap_or(UNKNOWN_CAPITAL)
}

/// Builds the next round from the session's country list.
pub fn next_round<R: Rng + ?Sized>(
    countries: &[CountryRecord],
    rng: &mut R,
) -> Result<Round, RoundError> {
    next_round_bounded(countries, rng, MAX_SAMPLE_DRAWS)
}

fn next_round_bounded<R: Rng + ?Sized>(
    countries: &[CountryRecord],
    rng: &mut R,
    max_draws: usize,
) -> Result<Round, RoundError> {
    let target = countries.choose(rng).ok_or(RoundError::EmptyCountryList)?;
    let correct = capital_of(target).to_string();

    // Distinct real capitals other than the answer, in list order
    let mut seen = HashSet::new();
    let pool: Vec<&str> = countries
        .iter()
        .filter_map(|c| c.capital.as_deref())
        .filter(|c| *c != correct && seen.insert(*c))
        .collect();

    let needed = OPTION_COUNT - 1;
    if pool.len() < needed {
        return Err(RoundError::NotEnoughCapitals {
            needed,
            found: pool.len(),
        });
    }

    let mut options = vec![correct.clone()];
    let mut draws = 0;
    while options.len() < OPTION_COUNT && draws < max_draws {
        draws += 1;
        let Some(candidate) = countries.choose(rng).and_then(|c| c.capital.as_deref()) else {
            continue;
        };
        if !options.iter().any(|o| o == candidate) {
            options.push(candidate.to_string());
        }
    }

    if options.len() < OPTION_COUNT {
        tracing::debug!(draws, "Distractor sampling exhausted, filling from remaining capitals");
        let remaining: Vec<&str> = pool
            .into_iter()
            .filter(|c| !options.iter().any(|o| o == c))
            .collect();
        let missing = OPTION_COUNT - options.len();
        options.extend(remaining.choose_multiple(rng, missing).map(|c| c.to_string()));
    }

    options.shuffle(rng);

    Ok(Round {
        country: target.name.clone(),
        country_code: target.code.clone(),
        correct_capital: correct,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn four_countries() -> Vec<CountryRecord> {
        vec![
            CountryRecord::new("US", Some("Washington")),
            CountryRecord::new("France", Some("Paris")),
            CountryRecord::new("Germany", Some("Berlin")),
            CountryRecord::new("Italy", Some("Rome")),
        ]
    }

    fn assert_well_formed(round: &Round) {
        assert_eq!(round.options.len(), OPTION_COUNT);
        let distinct: HashSet<&String> = round.options.iter().collect();
        assert_eq!(distinct.len(), OPTION_COUNT, "duplicate option in {:?}", round.options);
        let hits = round
            .options
            .iter()
            .filter(|o| **o == round.correct_capital)
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_hundred_rounds_never_duplicate() {
        let countries = four_countries();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let round = next_round(&countries, &mut rng).unwrap();
            assert_well_formed(&round);
        }
    }

    #[test]
    fn test_correct_capital_matches_country() {
        let countries = four_countries();
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let round = next_round(&countries, &mut rng).unwrap();
            let target = countries.iter().find(|c| c.name == round.country).unwrap();
            assert_eq!(target.capital.as_deref(), Some(round.correct_capital.as_str()));
        }
    }

    #[test]
    fn test_missing_capital_uses_placeholder() {
        let mut countries = four_countries();
        countries.push(CountryRecord::new("Antarctica", None));
        let mut rng = StdRng::seed_from_u64(7);

        let mut saw_placeholder = false;
        for _ in 0..500 {
            let round = next_round(&countries, &mut rng).unwrap();
            assert_well_formed(&round);
            if round.country == "Antarctica" {
                assert_eq!(round.correct_capital, UNKNOWN_CAPITAL);
                saw_placeholder = true;
            }
        }
        assert!(saw_placeholder);
    }

    #[test]
    fn test_empty_list_is_an_error() {
        let mut rng = rand::thread_rng();
        assert_eq!(next_round(&[], &mut rng), Err(RoundError::EmptyCountryList));
    }

    #[test]
    fn test_too_few_capitals_does_not_hang() {
        let countries = vec![
            CountryRecord::new("France", Some("Paris")),
            CountryRecord::new("Germany", Some("Berlin")),
            CountryRecord::new("Germany Again", Some("Berlin")),
            CountryRecord::new("Atlantis", None),
        ];
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let err = next_round(&countries, &mut rng).unwrap_err();
            assert!(matches!(err, RoundError::NotEnoughCapitals { needed: 3, .. }));
        }
    }

    #[test]
    fn test_round_carries_code_of_chosen_record() {
        let countries = vec![
            CountryRecord::new("Congo", Some("Brazzaville")).with_code("CG"),
            CountryRecord::new("Congo", Some("Kinshasa")).with_code("CD"),
            CountryRecord::new("France", Some("Paris")).with_code("FR"),
            CountryRecord::new("Italy", Some("Rome")).with_code("IT"),
        ];
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let round = next_round(&countries, &mut rng).unwrap();
            let target = countries
                .iter()
                .find(|c| c.capital.as_deref() == Some(round.correct_capital.as_str()))
                .unwrap();
            assert_eq!(round.country_code, target.code);
            if round.country == "Congo" {
                seen.insert(round.country_code.clone());
            }
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_exhausted_sampling_still_fills_options() {
        let countries = four_countries();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let round = next_round_bounded(&countries, &mut rng, 0).unwrap();
            assert_well_formed(&round);
        }
    }

    #[test]
    fn test_resolve_answer_by_number_and_text() {
        let round = Round {
            country: "France".to_string(),
            country_code: Some("FR".to_string()),
            correct_capital: "Paris".to_string(),
            options: vec![
                "Rome".to_string(),
                "Paris".to_string(),
                "Berlin".to_string(),
                "Bogotá".to_string(),
            ],
        };

        assert_eq!(round.resolve_answer("2"), Some("Paris"));
        assert_eq!(round.resolve_answer(" berlin "), Some("Berlin"));
        assert_eq!(round.resolve_answer("BOGOTÁ"), Some("Bogotá"));
        assert_eq!(round.resolve_answer("0"), None);
        assert_eq!(round.resolve_answer("5"), None);
        assert_eq!(round.resolve_answer("+2"), None);
        assert_eq!(round.resolve_answer("-1"), None);
        assert_eq!(round.resolve_answer("02"), Some("Paris"));
        assert_eq!(round.resolve_answer("Madrid"), None);
        assert_eq!(round.resolve_answer(""), None);
        assert!(round.is_correct("Paris"));
        assert!(!round.is_correct("paris"));
    }
}
