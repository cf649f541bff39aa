//! Penalty weights and constraint levels used to judge a candidate round.
//!
//! # Overview
//!
//! Two mechanisms decide how much a round may repeat earlier pairings:
//!
//! - **Penalty weights** ([`PenaltyWeights`]) drive the heuristic scheduler. Each match is scored
//!   by the [`ConstraintTracker`](crate::tracker::ConstraintTracker), lower being better:
//!   * repeated partners cost `partner * k²` per pair seen `k` times before
//!   * repeated opponents cost `opponent * k²` per pair
//!   * a player back on a venue costs `venue`
//!   * a fallback match costs `fallback_per_player` for each player on the field
//! - **Constraint levels** ([`ConstraintLevel`]) drive the backtracking scheduler. They are hard
//!   limits, relaxed one level at a time.
//!
//! # Example
//!
//! ```
//! use petanque_scheduler::constraints::PenaltyWeights;
//!
//! let weights = PenaltyWeights::new()
//!     .with_partner(20.0)
//!     .with_venue(3.0);
//! assert_eq!(weights.opponent, 5.0);
//! assert!(weights.validate().is_ok());
//! ```

use std::fmt;

use anyhow::bail;

/// Weights of each kind of repeat in a match penalty.
///
/// Defaults: partner 10, opponent 5, venue 2, fallback 1.5 per player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyWeights {
    /// Base cost of a repeated teammate pair.
    pub partner: f64,
    /// Base cost of a repeated opposing pair.
    pub opponent: f64,
    /// Cost of a player returning to a venue.
    pub venue: f64,
    /// Cost per seated player of a fallback match.
    pub fallback_per_player: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            partner: 10.0,
            opponent: 5.0,
            venue: 2.0,
            fallback_per_player: 1.5,
        }
    }
}

impl PenaltyWeights {
    /// Default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repeated partner weight.
    #[must_use]
    pub fn with_partner(self, weight: f64) -> Self {
        Self {
            partner: weight,
            ..self
        }
    }

    /// Sets the repeated opponent weight.
    #[must_use]
    pub fn with_opponent(self, weight: f64) -> Self {
        Self {
            opponent: weight,
            ..self
        }
    }

    /// Sets the repeated venue weight.
    #[must_use]
    pub fn with_venue(self, weight: f64) -> Self {
        Self {
            venue: weight,
            ..self
        }
    }

    /// Sets the per-player fallback weight.
    #[must_use]
    pub fn with_fallback_per_player(self, weight: f64) -> Self {
        Self {
            fallback_per_player: weight,
            ..self
        }
    }

    /// # Errors
    ///
    /// Returns an error if a weight is negative, NaN or infinite.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, weight) in [
            ("partner", self.partner),
            ("opponent", self.opponent),
            ("venue", self.venue),
            ("fallback", self.fallback_per_player),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                bail!("{name} penalty must be a finite non-negative number, got {weight}");
            }
        }
        Ok(())
    }
}

/// Tolerance of the backtracking search for repeated pairings, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintLevel {
    /// No pair may meet again, as partners or as opponents.
    Strict,
    /// Opponents may meet again (at most twice in total). Partners may not.
    AllowRepeatedOpponents,
    /// Partners and opponents may meet again (at most twice in total).
    AllowRepeatedPartners,
}

/// A pair may be seen at most this many times once a level allows repeats.
pub const MAX_RELAXED_MEETINGS: u32 = 2;

impl ConstraintLevel {
    /// Every level, in the order the search tries them.
    pub const ESCALATION: [ConstraintLevel; 3] = [
        ConstraintLevel::Strict,
        ConstraintLevel::AllowRepeatedOpponents,
        ConstraintLevel::AllowRepeatedPartners,
    ];

    /// 0 for strict, 2 for the most relaxed level.
    pub fn index(self) -> usize {
        match self {
            ConstraintLevel::Strict => 0,
            ConstraintLevel::AllowRepeatedOpponents => 1,
            ConstraintLevel::AllowRepeatedPartners => 2,
        }
    }

    /// True if two players who already were partners `previous` times may be partners again.
    pub fn allows_partners(self, previous: u32) -> bool {
        match self {
            ConstraintLevel::AllowRepeatedPartners => previous < MAX_RELAXED_MEETINGS,
            _ => previous == 0,
        }
    }

    /// True if two players who already faced each other `previous` times may face again.
    pub fn allows_opponents(self, previous: u32) -> bool {
        match self {
            ConstraintLevel::Strict => previous == 0,
            _ => previous < MAX_RELAXED_MEETINGS,
        }
    }
}

impl fmt::Display for ConstraintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintLevel::Strict => "strict (no repeats)",
            ConstraintLevel::AllowRepeatedOpponents => "relaxed (allow repeated opponents)",
            ConstraintLevel::AllowRepeatedPartners => "relaxed (allow repeated partners)",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod constraints_tests {
    use super::*;

    #[test]
    fn test_builder() {
        let w = PenaltyWeights::new()
            .with_partner(1.0)
            .with_opponent(2.0)
            .with_venue(3.0)
            .with_fallback_per_player(4.0);
        assert_eq!(
            w,
            PenaltyWeights {
                partner: 1.0,
                opponent: 2.0,
                venue: 3.0,
                fallback_per_player: 4.0
            }
        );
    }

    #[test]
    fn test_negative_or_nan_weight_rejected() {
        assert!(PenaltyWeights::new().with_venue(-1.0).validate().is_err());
        assert!(PenaltyWeights::new().with_partner(f64::NAN).validate().is_err());
        assert!(PenaltyWeights::new().with_opponent(0.0).validate().is_ok());
    }

    #[test]
    fn test_levels() {
        use ConstraintLevel::*;
        assert!(Strict.allows_partners(0));
        assert!(!Strict.allows_opponents(1));
        assert!(AllowRepeatedOpponents.allows_opponents(1));
        assert!(!AllowRepeatedOpponents.allows_opponents(2));
        assert!(!AllowRepeatedOpponents.allows_partners(1));
        assert!(AllowRepeatedPartners.allows_partners(1));
        assert!(!AllowRepeatedPartners.allows_partners(2));
        assert!(Strict < AllowRepeatedPartners);
        assert_eq!(AllowRepeatedPartners.index(), 2);
    }
}
