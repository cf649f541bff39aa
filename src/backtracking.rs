//! Exhaustive round search under hard pairing limits.
//!
//! Every role-valid team is enumerated once, which costs `C(n,3) + C(n,2)` for `n` active
//! players. The search then fills the matches one at a time (3v3 first, then 2v2, then 3v2),
//! undoing the last match whenever the remaining ones cannot be filled. The limits of
//! [`ConstraintLevel::Strict`] are tried first and only relaxed when no complete round exists.
//!
//! The enumeration grows quickly with the roster. Use
//! [`Configuration::with_backtracking_roster_limit`](crate::configuration::Configuration::with_backtracking_roster_limit)
//! to refuse rosters too large for it.

use itertools::Itertools;
use tracing::{debug, info, instrument, trace};

use crate::constraints::ConstraintLevel;
use crate::distribution::optimal_distribution;
use crate::error::{Result, ScheduleError};
use crate::format::{is_valid_team, MatchFormat, TournamentMode};
use crate::player::{Player, PlayerId};
use crate::report::QualityReport;
use crate::round::{Match, Round};
use crate::scheduler::{team_sizes, ActiveRoster, Scheduler};
use crate::tracker::ConstraintTracker;

/// Callback of the deterministic path: `(level index, message)`, called when a level starts and
/// once more when a round is found.
pub type LevelProgress<'a> = &'a mut dyn FnMut(usize, &str);

/// A role-valid team, as roster positions and ids.
#[derive(Debug, Clone)]
struct Team {
    members: Vec<usize>,
    ids: Vec<PlayerId>,
}

fn valid_teams(
    roster: &ActiveRoster,
    size: usize,
    format: MatchFormat,
    mode: TournamentMode,
) -> Vec<Team> {
    (0..roster.len())
        .combinations(size)
        .filter(|members| {
            let players = members
                .iter()
                .map(|&i| &roster.players[i])
                .collect::<Vec<_>>();
            is_valid_team(&players, format, mode)
        })
        .map(|members| Team {
            ids: roster.ids_of(&members),
            members,
        })
        .collect()
}

fn partners_allowed(tracker: &ConstraintTracker, level: ConstraintLevel, team: &[PlayerId]) -> bool {
    team.iter().enumerate().all(|(i, &a)| {
        team[i + 1..]
            .iter()
            .all(|&b| level.allows_partners(tracker.partner_count(a, b)))
    })
}

fn opponents_allowed(
    tracker: &ConstraintTracker,
    level: ConstraintLevel,
    team_a: &[PlayerId],
    team_b: &[PlayerId],
) -> bool {
    team_a.iter().all(|&a| {
        team_b
            .iter()
            .all(|&b| level.allows_opponents(tracker.opponent_count(a, b)))
    })
}

/// What stays fixed while searching one level.
struct SearchSpace<'a> {
    round_index: usize,
    level: ConstraintLevel,
    formats: &'a [MatchFormat],
    venues: &'a [String],
    full: Vec<&'a Team>,
    reduced: Vec<&'a Team>,
}

impl SearchSpace<'_> {
    fn teams(&self, size: usize) -> &[&Team] {
        if size == 3 {
            &self.full
        } else {
            &self.reduced
        }
    }
}

/// What the search changes, and restores on the way back.
struct SearchState {
    used: Vec<bool>,
    tracker: ConstraintTracker,
    matches: Vec<Match>,
    nodes: u64,
}

impl SearchState {
    fn is_free(&self, team: &Team) -> bool {
        team.members.iter().all(|&i| !self.used[i])
    }

    fn mark(&mut self, team: &Team, used: bool) {
        for &i in &team.members {
            self.used[i] = used;
        }
    }
}

/// Fills `slot` and the following ones.
///
/// Matches of the same format are interchangeable, so they are built in increasing order of
/// their first team (`first_a`), and a 3v3 or 2v2 match always lists its lower team first.
fn search(space: &SearchSpace<'_>, state: &mut SearchState, slot: usize, first_a: usize) -> Result<bool> {
    let Some(&format) = space.formats.get(slot) else {
        return Ok(true);
    };
    let (size_a, size_b) = team_sizes(format);
    let same_list = size_a == size_b;
    let teams_a = space.teams(size_a);
    let teams_b = space.teams(size_b);

    for (a, team_a) in teams_a.iter().enumerate().skip(first_a) {
        if !state.is_free(team_a) {
            continue;
        }
        state.mark(team_a, true);

        let start_b = if same_list { a + 1 } else { 0 };
        for team_b in teams_b.iter().skip(start_b) {
            state.nodes += 1;
            if !state.is_free(team_b)
                || !opponents_allowed(&state.tracker, space.level, &team_a.ids, &team_b.ids)
            {
                continue;
            }

            let m = Match::new(
                space.round_index,
                space.venues[slot].as_str(),
                format,
                team_a.ids.clone(),
                team_b.ids.clone(),
            )?;
            state.mark(team_b, true);
            state.tracker.add_match(&m);
            state.matches.push(m);

            let next_first = match space.formats.get(slot + 1) {
                Some(&next) if next == format => a + 1,
                _ => 0,
            };
            if search(space, state, slot + 1, next_first)? {
                return Ok(true);
            }

            if let Some(m) = state.matches.pop() {
                state.tracker.remove_match(&m);
            }
            state.mark(team_b, false);
        }

        state.mark(team_a, false);
    }

    Ok(false)
}

impl Scheduler {
    /// Generates round `round_index` by exhaustive search, relaxing the pairing limits one
    /// [`ConstraintLevel`] at a time.
    ///
    /// The result only depends on the roster order and on `previous_rounds`. `progress` is
    /// called with the index and a description of each level before it is searched, and again
    /// with the winning level once a round is found. Returns the
    /// round, its quality against `previous_rounds`, and the level it was found at.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidPlayer`] if an active player has no id, or ids collide.
    /// - [`ScheduleError::Infeasible`] with fewer than 4 active players, a roster above the
    ///   configured backtracking limit, or when even the most relaxed level has no solution.
    #[instrument(skip_all, fields(round = round_index))]
    pub fn generate_round_deterministic(
        &self,
        players: &[Player],
        round_index: usize,
        previous_rounds: &[Round],
        mut progress: Option<LevelProgress<'_>>,
    ) -> Result<(Round, QualityReport, ConstraintLevel)> {
        let roster = ActiveRoster::new(players)?;
        if let Some(limit) = self.config.backtracking_roster_limit {
            if roster.len() > limit {
                return Err(ScheduleError::Infeasible(format!(
                    "{} active players exceed the backtracking limit of {limit}",
                    roster.len()
                )));
            }
        }

        let mode = self.config.mode;
        let distribution = optimal_distribution(roster.len(), mode);
        let formats = distribution.formats();
        let venues = self.prepare_venues(&distribution, roster.len())?;

        let full = if distribution.triplette + distribution.hybrid > 0 {
            valid_teams(&roster, 3, MatchFormat::Triplette, mode)
        } else {
            Vec::new()
        };
        let reduced = if distribution.doublette + distribution.hybrid > 0 {
            valid_teams(&roster, 2, MatchFormat::Doublette, mode)
        } else {
            Vec::new()
        };
        debug!(
            players = roster.len(),
            %distribution,
            full_teams = full.len(),
            reduced_teams = reduced.len()
        );

        let history = self.history(previous_rounds);

        for level in ConstraintLevel::ESCALATION {
            if let Some(callback) = progress.as_mut() {
                callback(level.index(), &format!("trying {level}"));
            }

            let space = SearchSpace {
                round_index,
                level,
                formats: &formats,
                venues: &venues,
                full: full
                    .iter()
                    .filter(|t| partners_allowed(&history, level, &t.ids))
                    .collect(),
                reduced: reduced
                    .iter()
                    .filter(|t| partners_allowed(&history, level, &t.ids))
                    .collect(),
            };
            let mut state = SearchState {
                used: vec![false; roster.len()],
                tracker: history.clone(),
                matches: Vec::with_capacity(formats.len()),
                nodes: 0,
            };

            if search(&space, &mut state, 0, 0)? {
                let report = history.quality_report(&state.matches, &self.config.grade_bands);
                let round = Round::new(round_index, state.matches).with_quality_report(report);
                info!(
                    %level,
                    nodes = state.nodes,
                    score = report.total_score,
                    grade = %report.grade,
                    "round generated"
                );
                if let Some(callback) = progress.as_mut() {
                    callback(level.index(), &format!("found a round at {level}"));
                }
                return Ok((round, report, level));
            }
            trace!(%level, nodes = state.nodes, "search exhausted");
            debug!(%level, "no complete round at this level");
        }

        Err(ScheduleError::Infeasible(format!(
            "no complete round for {} players even when partners and opponents may repeat: too many rounds for this player count",
            roster.len()
        )))
    }
}
