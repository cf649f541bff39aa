//! History of who played with, against and where, across previous rounds.
//!
//! The tracker is a pure function of the matches replayed into it: the order of
//! [`ConstraintTracker::add_match`] calls does not matter. Adding the same match twice counts it
//! twice.

use std::collections::{BTreeSet, HashMap};

use crate::constraints::PenaltyWeights;
use crate::format::{MatchFormat, TournamentMode};
use crate::player::PlayerId;
use crate::report::{GradeBands, QualityReport};
use crate::round::{Match, Round};

type Pair = (PlayerId, PlayerId);

fn pair(a: PlayerId, b: PlayerId) -> Pair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn decrement<K: std::hash::Hash + Eq>(map: &mut HashMap<K, u32>, key: K) {
    if let Some(count) = map.get_mut(&key) {
        *count -= 1;
        if *count == 0 {
            map.remove(&key);
        }
    }
}

/// Accumulated pairings of a tournament, used to score candidate matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintTracker {
    mode: TournamentMode,
    weights: PenaltyWeights,
    partners: HashMap<Pair, u32>,
    opponents: HashMap<Pair, u32>,
    venues: HashMap<PlayerId, HashMap<String, u32>>,
    fallbacks: HashMap<PlayerId, u32>,
    match_count: usize,
}

impl ConstraintTracker {
    /// Empty history.
    pub fn new(mode: TournamentMode, weights: PenaltyWeights) -> Self {
        Self {
            mode,
            weights,
            partners: HashMap::new(),
            opponents: HashMap::new(),
            venues: HashMap::new(),
            fallbacks: HashMap::new(),
            match_count: 0,
        }
    }

    /// History made of every match of `rounds`.
    pub fn from_rounds<'a>(
        mode: TournamentMode,
        weights: PenaltyWeights,
        rounds: impl IntoIterator<Item = &'a Round>,
    ) -> Self {
        let mut tracker = Self::new(mode, weights);
        for round in rounds {
            for m in round.matches() {
                tracker.add_match(m);
            }
        }
        tracker
    }

    /// Mode used to decide what a fallback match is.
    pub fn mode(&self) -> TournamentMode {
        self.mode
    }

    /// Number of matches replayed so far.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Records every relation created by `m`.
    pub fn add_match(&mut self, m: &Match) {
        for team in m.teams() {
            for (i, &a) in team.iter().enumerate() {
                for &b in &team[i + 1..] {
                    *self.partners.entry(pair(a, b)).or_default() += 1;
                }
            }
        }
        for &a in m.team_a() {
            for &b in m.team_b() {
                *self.opponents.entry(pair(a, b)).or_default() += 1;
            }
        }
        let fallback = self.mode.is_fallback(m.format());
        for id in m.all_player_ids() {
            *self
                .venues
                .entry(id)
                .or_default()
                .entry(m.venue().to_owned())
                .or_default() += 1;
            if fallback {
                *self.fallbacks.entry(id).or_default() += 1;
            }
        }
        self.match_count += 1;
    }

    /// Undoes a previous [`add_match`](Self::add_match) of the same match.
    pub fn remove_match(&mut self, m: &Match) {
        for team in m.teams() {
            for (i, &a) in team.iter().enumerate() {
                for &b in &team[i + 1..] {
                    decrement(&mut self.partners, pair(a, b));
                }
            }
        }
        for &a in m.team_a() {
            for &b in m.team_b() {
                decrement(&mut self.opponents, pair(a, b));
            }
        }
        let fallback = self.mode.is_fallback(m.format());
        for id in m.all_player_ids() {
            if let Some(venues) = self.venues.get_mut(&id) {
                decrement(venues, m.venue().to_owned());
                if venues.is_empty() {
                    self.venues.remove(&id);
                }
            }
            if fallback {
                decrement(&mut self.fallbacks, id);
            }
        }
        self.match_count = self.match_count.saturating_sub(1);
    }

    /// Times `a` and `b` were on the same team.
    pub fn partner_count(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.partners.get(&pair(a, b)).copied().unwrap_or(0)
    }

    /// Times `a` and `b` were on opposing teams.
    pub fn opponent_count(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.opponents.get(&pair(a, b)).copied().unwrap_or(0)
    }

    /// Everyone `id` has partnered with.
    pub fn partners_of(&self, id: PlayerId) -> BTreeSet<PlayerId> {
        Self::others(&self.partners, id)
    }

    /// Everyone `id` has faced.
    pub fn opponents_of(&self, id: PlayerId) -> BTreeSet<PlayerId> {
        Self::others(&self.opponents, id)
    }

    fn others(pairs: &HashMap<Pair, u32>, id: PlayerId) -> BTreeSet<PlayerId> {
        pairs
            .keys()
            .filter_map(|&(a, b)| match (a == id, b == id) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .collect()
    }

    /// Venues `id` has played on.
    pub fn venues_of(&self, id: PlayerId) -> BTreeSet<&str> {
        self.venues
            .get(&id)
            .map(|v| v.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// True if `id` already played on `venue`.
    pub fn has_played_on(&self, id: PlayerId, venue: &str) -> bool {
        self.venues
            .get(&id)
            .is_some_and(|venues| venues.contains_key(venue))
    }

    /// Matches `id` played in a fallback format.
    pub fn fallback_count(&self, id: PlayerId) -> u32 {
        self.fallbacks.get(&id).copied().unwrap_or(0)
    }

    /// Penalty of a candidate match against the recorded history. Lower is better.
    pub fn score_match(
        &self,
        team_a: &[PlayerId],
        team_b: &[PlayerId],
        venue: &str,
        format: MatchFormat,
    ) -> f64 {
        let mut score = 0.0;

        // quadratic: a pair seen twice costs 4 times the base weight
        for team in [team_a, team_b] {
            for (i, &a) in team.iter().enumerate() {
                for &b in &team[i + 1..] {
                    let k = f64::from(self.partner_count(a, b));
                    score += self.weights.partner * k * k;
                }
            }
        }
        for &a in team_a {
            for &b in team_b {
                let k = f64::from(self.opponent_count(a, b));
                score += self.weights.opponent * k * k;
            }
        }

        for &id in team_a.iter().chain(team_b) {
            if self.has_played_on(id, venue) {
                score += self.weights.venue;
            }
        }

        if self.mode.is_fallback(format) {
            score += self.weights.fallback_per_player * (team_a.len() + team_b.len()) as f64;
        }

        score
    }

    /// Sum of [`score_match`](Self::score_match) over `matches`.
    pub fn score_matches(&self, matches: &[Match]) -> f64 {
        matches
            .iter()
            .map(|m| self.score_match(m.team_a(), m.team_b(), m.venue(), m.format()))
            .sum()
    }

    /// Counts the repeats `matches` would add to this history.
    pub fn quality_report(&self, matches: &[Match], bands: &GradeBands) -> QualityReport {
        let mut report = QualityReport::default();

        for m in matches {
            for team in m.teams() {
                for (i, &a) in team.iter().enumerate() {
                    for &b in &team[i + 1..] {
                        if self.partner_count(a, b) > 0 {
                            report.repeated_partners += 1;
                        }
                    }
                }
            }
            for &a in m.team_a() {
                for &b in m.team_b() {
                    if self.opponent_count(a, b) > 0 {
                        report.repeated_opponents += 1;
                    }
                }
            }
            report.repeated_venues += m
                .all_player_ids()
                .filter(|&id| self.has_played_on(id, m.venue()))
                .count();
            if self.mode.is_fallback(m.format()) {
                report.fallback_matches += 1;
            }
        }

        report.total_score = self.score_matches(matches);
        report.grade = bands.grade(report.total_score);
        report
    }
}
