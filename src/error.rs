//! Errors produced while building tournament entities or scheduling a round.

use thiserror::Error;

use crate::format::MatchFormat;

/// Everything that can go wrong inside the scheduling core.
///
/// Infeasibility is always reported, never degraded into a partial round.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Not enough players, no role-valid team, or the search ran out of options.
    #[error("scheduling is infeasible: {0}")]
    Infeasible(String),

    /// A match could not be built (team sizes, overlapping or duplicated players).
    #[error("invalid match: {0}")]
    InvalidMatch(String),

    /// A player could not be built or is unusable by the scheduler.
    #[error("invalid player: {0}")]
    InvalidPlayer(String),

    /// Scores must both be within `0..=MAX_SCORE`.
    #[error("invalid score {score_a}-{score_b} (max {max})")]
    InvalidScore {
        /// Score of team A.
        score_a: u8,
        /// Score of team B.
        score_b: u8,
        /// Highest allowed score.
        max: u8,
    },

    /// Venue labels stop at `ZZ`.
    #[error("venue index {0} is out of range (max 701, venue ZZ)")]
    VenueOutOfRange(usize),

    /// Requested team size does not exist for this format.
    #[error("no team of {size} players in a {format} match")]
    UnsupportedTeamSize {
        /// Requested size.
        size: usize,
        /// Format of the match.
        format: MatchFormat,
    },
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;
