//! Round generation.
//!
//! [`Scheduler`] holds the tournament [`Configuration`] and nothing else: every call is handed
//! the roster and the rounds already played, and rebuilds the pairing history from them. Two
//! strategies are available:
//!
//! - [`Scheduler::generate_round`] tries many random arrangements and keeps the one with the
//!   lowest penalty. This is the usual path.
//! - [`Scheduler::generate_round_deterministic`] explores every arrangement under hard limits,
//!   relaxing them until a round fits. See the [`backtracking`](crate::backtracking) module.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, trace, warn};

use crate::configuration::Configuration;
use crate::distribution::{optimal_distribution, MatchDistribution, MIN_PLAYERS};
use crate::error::{Result, ScheduleError};
use crate::format::{MatchFormat, TournamentMode};
use crate::logger;
use crate::player::{Player, PlayerId};
use crate::report::QualityReport;
use crate::round::{Match, Round};
use crate::team_formation::TeamFormer;
use crate::tracker::ConstraintTracker;
use crate::venue::venue_label;

/// Callback of the heuristic path: `(attempt, total_attempts, best_score)`, called each time the
/// best arrangement improves.
pub type AttemptProgress<'a> = &'a mut dyn FnMut(usize, usize, f64);

/// Active players of a roster, with their ids at the same positions.
#[derive(Debug, Clone)]
pub(crate) struct ActiveRoster {
    pub(crate) players: Vec<Player>,
    pub(crate) ids: Vec<PlayerId>,
}

impl ActiveRoster {
    /// Keeps the active players.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidPlayer`] for an active player without id or two players sharing
    /// an id, [`ScheduleError::Infeasible`] below [`MIN_PLAYERS`] active players.
    pub(crate) fn new(players: &[Player]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut roster = ActiveRoster {
            players: Vec::with_capacity(players.len()),
            ids: Vec::with_capacity(players.len()),
        };
        for player in players.iter().filter(|p| p.is_active()) {
            let id = player.require_id()?;
            if !seen.insert(id) {
                return Err(ScheduleError::InvalidPlayer(format!(
                    "player id {id} appears twice in the roster"
                )));
            }
            roster.players.push(player.clone());
            roster.ids.push(id);
        }

        if roster.players.len() < MIN_PLAYERS {
            return Err(ScheduleError::Infeasible(format!(
                "at least {MIN_PLAYERS} active players are required, got {}",
                roster.players.len()
            )));
        }
        Ok(roster)
    }

    pub(crate) fn len(&self) -> usize {
        self.players.len()
    }

    pub(crate) fn ids_of(&self, team: &[usize]) -> Vec<PlayerId> {
        team.iter().map(|&i| self.ids[i]).collect()
    }
}

/// Sizes of side A and side B. Hybrid matches put the 3-player team first.
pub(crate) fn team_sizes(format: MatchFormat) -> (usize, usize) {
    match format {
        MatchFormat::Triplette => (3, 3),
        MatchFormat::Doublette => (2, 2),
        MatchFormat::Hybrid => (3, 2),
    }
}

/// Generates the rounds of one tournament.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pub(crate) config: Configuration,
}

impl Scheduler {
    /// Creates a scheduler, installing the file logger if the configuration asks for it.
    ///
    /// # Errors
    /// Fails if the configuration is out of range or the logger cannot be installed.
    pub fn new(config: Configuration) -> anyhow::Result<Self> {
        config.validate()?;
        if config.log {
            logger::init_logger()?;
        }
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Preferred team size.
    pub fn mode(&self) -> TournamentMode {
        self.config.mode
    }

    /// Pairing history of `previous_rounds`.
    pub fn history(&self, previous_rounds: &[Round]) -> ConstraintTracker {
        ConstraintTracker::from_rounds(self.config.mode, self.config.penalties, previous_rounds)
    }

    /// Seeded from the configuration and the round index, or from the OS without a seed.
    pub(crate) fn rng(&self, round_index: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(round_index as u64)),
            None => StdRng::from_os_rng(),
        }
    }

    /// Venue labels for the matches of `distribution`, warning when the configured venues are
    /// not enough or players have to sit out.
    pub(crate) fn prepare_venues(
        &self,
        distribution: &MatchDistribution,
        player_count: usize,
    ) -> Result<Vec<String>> {
        let matches = distribution.match_count();
        if matches > self.config.venue_count {
            warn!(
                matches,
                venues = self.config.venue_count,
                "more matches than configured venues"
            );
        }
        let benched = player_count - distribution.seated();
        if benched > 0 {
            warn!(benched, "not every active player can be seated");
        }
        (0..matches).map(venue_label).collect()
    }

    /// Generates round `round_index` by trying random arrangements and keeping the best one.
    ///
    /// `attempts` overrides the configured budget. `progress` is called whenever a better
    /// arrangement is found. Returns the round, its quality against `previous_rounds`, and the
    /// number of attempts used.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidPlayer`] if an active player has no id, or ids collide.
    /// - [`ScheduleError::Infeasible`] with fewer than 4 active players, or when no attempt
    ///   produced a complete round.
    #[instrument(skip_all, fields(round = round_index))]
    pub fn generate_round(
        &self,
        players: &[Player],
        round_index: usize,
        previous_rounds: &[Round],
        attempts: Option<usize>,
        mut progress: Option<AttemptProgress<'_>>,
    ) -> Result<(Round, QualityReport, usize)> {
        let roster = ActiveRoster::new(players)?;
        let distribution = optimal_distribution(roster.len(), self.config.mode);
        debug!(players = roster.len(), %distribution);
        let formats = distribution.formats();
        let venues = self.prepare_venues(&distribution, roster.len())?;

        let history = self.history(previous_rounds);
        let former = TeamFormer::new(self.config.mode, &roster.players);
        let mut rng = self.rng(round_index);
        let total = attempts.unwrap_or(self.config.attempts);

        let mut best: Option<(Vec<Match>, f64)> = None;
        let mut used = 0;
        for attempt in 0..total {
            used = attempt + 1;
            let Some(matches) =
                self.try_arrangement(&former, &roster, &formats, &venues, round_index, &mut rng)?
            else {
                trace!(attempt, "incomplete arrangement discarded");
                continue;
            };

            let score = history.score_matches(&matches);
            trace!(attempt, score);
            if best.as_ref().map_or(true, |(_, best_score)| score < *best_score) {
                debug!(attempt, score, "better arrangement");
                best = Some((matches, score));
                if let Some(callback) = progress.as_mut() {
                    callback(used, total, score);
                }
            }

            let best_score = best.as_ref().map_or(f64::INFINITY, |(_, s)| *s);
            if best_score == 0.0
                || (used >= self.config.min_attempts_before_early_stop
                    && best_score < self.config.good_enough_score)
            {
                break;
            }
        }

        let Some((matches, score)) = best else {
            return Err(ScheduleError::Infeasible(format!(
                "unable to generate a complete round after {total} attempts"
            )));
        };

        let report = history.quality_report(&matches, &self.config.grade_bands);
        let round = Round::new(round_index, matches).with_quality_report(report);
        info!(
            attempts = used,
            score,
            grade = %report.grade,
            benched = round.benched(players).len(),
            "round generated"
        );
        Ok((round, report, used))
    }

    /// One random arrangement, `None` as soon as a team cannot be formed.
    fn try_arrangement(
        &self,
        former: &TeamFormer,
        roster: &ActiveRoster,
        formats: &[MatchFormat],
        venues: &[String],
        round_index: usize,
        rng: &mut StdRng,
    ) -> Result<Option<Vec<Match>>> {
        let mut available = vec![true; roster.len()];
        let mut matches = Vec::with_capacity(formats.len());

        for (&format, venue) in formats.iter().zip(venues) {
            let (size_a, size_b) = team_sizes(format);
            let Some(team_a) = infeasible_as_none(former.form_team(&available, size_a, format, rng))?
            else {
                return Ok(None);
            };
            for &i in &team_a {
                available[i] = false;
            }
            let Some(team_b) = infeasible_as_none(former.form_team(&available, size_b, format, rng))?
            else {
                return Ok(None);
            };
            for &i in &team_b {
                available[i] = false;
            }

            matches.push(Match::new(
                round_index,
                venue.as_str(),
                format,
                roster.ids_of(&team_a),
                roster.ids_of(&team_b),
            )?);
        }

        Ok(Some(matches))
    }
}

fn infeasible_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ScheduleError::Infeasible(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
