//! Tournament and scheduler settings
//!
//! This module provides configuration options for the tournament (mode, number of rounds and
//! venues, seed) and for the search itself (attempt budget, penalty weights, grade bands).
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional and case-insensitive. Unparseable values are ignored.
//!
//! - `PETANQUE_MODE`: `triplette` or `doublette` (default: `triplette`)
//! - `PETANQUE_ROUNDS`: Number of rounds in the tournament (default: `3`)
//! - `PETANQUE_VENUES`: Number of available venues (default: `8`)
//! - `PETANQUE_SEED`: Seed making generation reproducible (default: none)
//! - `PETANQUE_ATTEMPTS`: Heuristic attempt budget per round (default: `500`)
//! - `PETANQUE_LOG`: Set to `"true"` to write logs to a file (default: `false`)

use std::env;

use anyhow::bail;

use crate::constraints::PenaltyWeights;
use crate::format::TournamentMode;
use crate::report::GradeBands;
use crate::venue::MAX_VENUES;

/// Most rounds a tournament may have.
pub const MAX_ROUNDS: usize = 10;

/// Tournament and scheduler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub(crate) mode: TournamentMode,
    pub(crate) rounds_count: usize,
    pub(crate) venue_count: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) attempts: usize,
    pub(crate) min_attempts_before_early_stop: usize,
    pub(crate) good_enough_score: f64,
    pub(crate) penalties: PenaltyWeights,
    pub(crate) grade_bands: GradeBands,
    pub(crate) backtracking_roster_limit: Option<usize>,
    pub(crate) log: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - The tournament favours triplettes (3v3).
    /// - It lasts 3 rounds on 8 venues.
    /// - No seed is set, so every generation differs.
    /// - The heuristic tries up to 500 arrangements, and stops early after 100 of them once the
    ///   best score is below 10.
    /// - Penalties and grades use [`PenaltyWeights::default`] and [`GradeBands::default`].
    /// - The backtracking search accepts any roster size.
    /// - Logging to file is disabled.
    pub fn new() -> Self {
        Self {
            mode: TournamentMode::Triplette,
            rounds_count: 3,
            venue_count: 8,
            seed: None,
            attempts: 500,
            min_attempts_before_early_stop: 100,
            good_enough_score: 10.0,
            penalties: PenaltyWeights::default(),
            grade_bands: GradeBands::default(),
            backtracking_roster_limit: None,
            log: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// The following environment variables are recognized:
    /// - `PETANQUE_MODE`: `triplette` or `doublette`
    /// - `PETANQUE_ROUNDS`: number of rounds
    /// - `PETANQUE_VENUES`: number of venues
    /// - `PETANQUE_SEED`: seed of the random generator
    /// - `PETANQUE_ATTEMPTS`: heuristic attempts per round
    /// - `PETANQUE_LOG`: if set to `"true"`, enables logging to file
    ///
    /// Any other value (including unset) keeps the default value of the field.
    pub fn from_env() -> Self {
        fn parse<T: std::str::FromStr>(var: &str) -> Option<T> {
            env::var(var).ok()?.trim().parse().ok()
        }

        let defaults = Self::new();
        Self {
            mode: parse("PETANQUE_MODE").unwrap_or(defaults.mode),
            rounds_count: parse("PETANQUE_ROUNDS").unwrap_or(defaults.rounds_count),
            venue_count: parse("PETANQUE_VENUES").unwrap_or(defaults.venue_count),
            seed: parse("PETANQUE_SEED").or(defaults.seed),
            attempts: parse("PETANQUE_ATTEMPTS").unwrap_or(defaults.attempts),
            log: match env::var("PETANQUE_LOG") {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => defaults.log,
            },
            ..defaults
        }
    }

    /// Set the preferred team size.
    pub fn with_mode(mut self, mode: TournamentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of rounds of the tournament.
    pub fn with_rounds_count(mut self, rounds: usize) -> Self {
        self.rounds_count = rounds;
        self
    }

    /// Set the number of venues available.
    pub fn with_venue_count(mut self, venues: usize) -> Self {
        self.venue_count = venues;
        self
    }

    /// Make generation reproducible.
    ///
    /// With a seed, the same roster, round index and history always give the same round.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of arrangements tried by the heuristic scheduler.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the early stop rule: after `min_attempts`, stop once the best score is below `score`.
    pub fn with_early_stop(mut self, min_attempts: usize, score: f64) -> Self {
        self.min_attempts_before_early_stop = min_attempts;
        self.good_enough_score = score;
        self
    }

    /// Set the penalty weights.
    pub fn with_penalties(mut self, penalties: PenaltyWeights) -> Self {
        self.penalties = penalties;
        self
    }

    /// Set the grade bands.
    pub fn with_grade_bands(mut self, bands: GradeBands) -> Self {
        self.grade_bands = bands;
        self
    }

    /// Refuse the backtracking search above `players` players.
    ///
    /// Enumerating every team costs `C(n,3) + C(n,2)`, which grows quickly with the roster.
    pub fn with_backtracking_roster_limit(mut self, players: usize) -> Self {
        self.backtracking_roster_limit = Some(players);
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Preferred team size.
    pub fn mode(&self) -> TournamentMode {
        self.mode
    }

    /// Number of rounds of the tournament.
    pub fn rounds_count(&self) -> usize {
        self.rounds_count
    }

    /// Number of venues.
    pub fn venue_count(&self) -> usize {
        self.venue_count
    }

    /// Seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Penalty weights.
    pub fn penalties(&self) -> &PenaltyWeights {
        &self.penalties
    }

    /// Grade bands.
    pub fn grade_bands(&self) -> &GradeBands {
        &self.grade_bands
    }

    /// Checks every value is within range.
    ///
    /// # Errors
    ///
    /// Returns an error when a count is out of range, a weight is negative or not finite, or the
    /// grade bands are not increasing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_ROUNDS).contains(&self.rounds_count) {
            bail!(
                "rounds count must be between 1 and {MAX_ROUNDS}, got {}",
                self.rounds_count
            );
        }
        if !(1..=MAX_VENUES).contains(&self.venue_count) {
            bail!(
                "venue count must be between 1 and {MAX_VENUES}, got {}",
                self.venue_count
            );
        }
        if self.attempts == 0 {
            bail!("at least one attempt is required");
        }
        if !self.good_enough_score.is_finite() || self.good_enough_score < 0.0 {
            bail!(
                "good enough score must be finite and non-negative, got {}",
                self.good_enough_score
            );
        }
        self.penalties.validate()?;
        if !self.grade_bands.is_ordered() {
            bail!("grade bands must be finite, positive and increasing: {:?}", self.grade_bands);
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
