//! # Petanque Scheduler
//!
//! Round generation for pétanque tournaments where players are re-mixed into new teams every
//! round.
//!
//! It provides:
//! - The best mix of 3v3, 2v2 and 3v2 matches for any roster size ([`distribution`])
//! - Role-aware team formation: every team has a Tireur, and 3-player teams in a triplette
//!   tournament also have a Pointeur and a Milieu ([`format`], [`team_formation`])
//! - A history of partners, opponents and venues used to penalise repeats ([`tracker`])
//! - Two round generators on [`Scheduler`](crate::scheduler::Scheduler): a randomized
//!   best-of-N search and an exhaustive backtracking search ([`backtracking`])
//! - A quality report graded from `A+` to `F` for every round ([`report`])
//!
//! # Documentation Overview
//!
//! - For tournament settings, penalty weights and environment variables, see
//!   [`Configuration`](crate::configuration::Configuration) and [`constraints`].
//! - For the domain objects, see [`player`] and [`round`].
//! - For persisting a tournament and chaining rounds, see the [`storage`] module.
//!
//! # Usage Example
//!
//! ```
//! use petanque_scheduler::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut store = MemoryStore::new();
//!     for (name, role) in [
//!         ("Alice", Role::Tireur),
//!         ("Bruno", Role::Pointeur),
//!         ("Chloé", Role::Milieu),
//!         ("David", Role::Tireur),
//!         ("Emma", Role::Pointeur),
//!         ("Farid", Role::Milieu),
//!     ] {
//!         store.add_player(Player::new(name, [role])?)?;
//!     }
//!
//!     // Same seed, same rounds
//!     let config = Configuration::new().with_seed(2024).with_rounds_count(2);
//!     store.save_config(&config)?;
//!     let scheduler = Scheduler::new(store.load_config()?)?;
//!
//!     let (round, report) =
//!         schedule_next_round(&mut store, &scheduler, GenerationStrategy::Heuristic)?;
//!     for m in round.matches() {
//!         println!("{m}");
//!     }
//!     println!("{report}");
//!
//!     store.record_score(0, "A", 13, 9)?;
//!     let (_, report) =
//!         schedule_next_round(&mut store, &scheduler, GenerationStrategy::Deterministic)?;
//!     assert!(report.repeated_partners > 0);
//!
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

pub use anyhow;

pub mod backtracking;
pub mod configuration;
pub mod constraints;
pub mod distribution;
pub mod error;
pub mod format;
mod logger;
pub mod player;
pub mod report;
pub mod round;
pub mod scheduler;
pub mod storage;
pub mod team_formation;
pub mod tracker;
pub mod venue;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use petanque_scheduler::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration)
/// - [`Scheduler`](crate::scheduler::Scheduler)
/// - the domain types: [`Player`](crate::player::Player), [`Match`](crate::round::Match),
///   [`Round`](crate::round::Round)
/// - [`TournamentStore`](crate::storage::TournamentStore) and its in-memory implementation
pub mod prelude {
    pub use crate::configuration::Configuration;
    pub use crate::constraints::{ConstraintLevel, PenaltyWeights};
    pub use crate::error::ScheduleError;
    pub use crate::format::{MatchFormat, TournamentMode};
    pub use crate::player::{Player, PlayerId, Role};
    pub use crate::report::{Grade, GradeBands, QualityReport};
    pub use crate::round::{Match, Round};
    pub use crate::scheduler::Scheduler;
    pub use crate::storage::{schedule_next_round, GenerationStrategy, MemoryStore, TournamentStore};
}
