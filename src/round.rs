//! Matches and rounds, the objects the scheduler hands back to be persisted.

use std::collections::HashSet;
use std::fmt;

use time::OffsetDateTime;

use crate::error::{Result, ScheduleError};
use crate::format::MatchFormat;
use crate::player::{Player, PlayerId};
use crate::report::QualityReport;

/// Highest score a team can reach in a pétanque game.
pub const MAX_SCORE: u8 = 13;

/// Two teams facing each other on a venue.
///
/// Construction validates team sizes against the format and rejects any player listed twice.
/// Equality ignores the creation timestamp.
#[derive(Debug, Clone)]
pub struct Match {
    round_index: usize,
    venue: String,
    format: MatchFormat,
    team_a: Vec<PlayerId>,
    team_b: Vec<PlayerId>,
    scores: Option<(u8, u8)>,
    created_at: OffsetDateTime,
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.round_index == other.round_index
            && self.venue == other.venue
            && self.format == other.format
            && self.team_a == other.team_a
            && self.team_b == other.team_b
            && self.scores == other.scores
    }
}

impl Match {
    /// Builds an unplayed match.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidMatch`] if the venue is empty, the team sizes do not fit
    /// `format`, a team lists a player twice, or a player is on both teams.
    pub fn new(
        round_index: usize,
        venue: impl Into<String>,
        format: MatchFormat,
        team_a: Vec<PlayerId>,
        team_b: Vec<PlayerId>,
    ) -> Result<Match> {
        let venue = venue.into();
        if venue.is_empty() {
            return Err(ScheduleError::InvalidMatch("venue label is empty".into()));
        }
        if !format.accepts_sizes(team_a.len(), team_b.len()) {
            return Err(ScheduleError::InvalidMatch(format!(
                "{format} requires other team sizes, got {}v{}",
                team_a.len(),
                team_b.len()
            )));
        }
        for team in [&team_a, &team_b] {
            let unique = team.iter().collect::<HashSet<_>>();
            if unique.len() != team.len() {
                return Err(ScheduleError::InvalidMatch(
                    "a team cannot list the same player twice".into(),
                ));
            }
        }
        if let Some(id) = team_a.iter().find(|id| team_b.contains(id)) {
            return Err(ScheduleError::InvalidMatch(format!(
                "player {id} cannot play against themselves"
            )));
        }

        Ok(Match {
            round_index,
            venue,
            format,
            team_a,
            team_b,
            scores: None,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// Index of the round this match belongs to.
    pub fn round_index(&self) -> usize {
        self.round_index
    }

    /// Venue label.
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Format of the match.
    pub fn format(&self) -> MatchFormat {
        self.format
    }

    /// Players of team A.
    pub fn team_a(&self) -> &[PlayerId] {
        &self.team_a
    }

    /// Players of team B.
    pub fn team_b(&self) -> &[PlayerId] {
        &self.team_b
    }

    /// Both teams, A then B.
    pub fn teams(&self) -> [&[PlayerId]; 2] {
        [&self.team_a, &self.team_b]
    }

    /// Everyone on the field, team A first.
    pub fn all_player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_a.iter().chain(self.team_b.iter()).copied()
    }

    /// `(score_a, score_b)` once the result has been entered.
    pub fn scores(&self) -> Option<(u8, u8)> {
        self.scores
    }

    /// When the match was built.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// A match is complete once both scores are known.
    pub fn is_complete(&self) -> bool {
        self.scores.is_some()
    }

    /// Enters the result of the match.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidScore`] if a score exceeds [`MAX_SCORE`].
    pub fn record_score(&mut self, score_a: u8, score_b: u8) -> Result<()> {
        if score_a > MAX_SCORE || score_b > MAX_SCORE {
            return Err(ScheduleError::InvalidScore {
                score_a,
                score_b,
                max: MAX_SCORE,
            });
        }
        self.scores = Some((score_a, score_b));
        Ok(())
    }

    /// Forgets the result.
    pub fn clear_score(&mut self) {
        self.scores = None;
    }

    /// Players of the winning team, `None` for unplayed or drawn matches.
    pub fn winner(&self) -> Option<&[PlayerId]> {
        let (a, b) = self.scores?;
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(&self.team_a),
            std::cmp::Ordering::Less => Some(&self.team_b),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |team: &[PlayerId]| {
            team.iter()
                .map(PlayerId::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(
            f,
            "[{}] {} vs {}",
            self.venue,
            side(&self.team_a),
            side(&self.team_b)
        )?;
        if let Some((a, b)) = self.scores {
            write!(f, " ({a}-{b})")?;
        }
        Ok(())
    }
}

/// All matches played at the same time.
#[derive(Debug, Clone)]
pub struct Round {
    index: usize,
    matches: Vec<Match>,
    quality_report: Option<QualityReport>,
    created_at: OffsetDateTime,
}

impl PartialEq for Round {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.matches == other.matches
            && self.quality_report == other.quality_report
    }
}

impl Round {
    /// Wraps the matches of round `index`.
    pub fn new(index: usize, matches: Vec<Match>) -> Round {
        Round {
            index,
            matches,
            quality_report: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Attaches the report computed when the round was generated.
    #[must_use]
    pub fn with_quality_report(self, report: QualityReport) -> Self {
        Self {
            quality_report: Some(report),
            ..self
        }
    }

    /// Round index, unique within a tournament.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Matches of the round, in venue order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Mutable access for the results-entry workflow.
    pub fn matches_mut(&mut self) -> &mut [Match] {
        &mut self.matches
    }

    /// Snapshot taken at generation time.
    pub fn quality_report(&self) -> Option<&QualityReport> {
        self.quality_report.as_ref()
    }

    /// When the round was built.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// True when every match has a result. An empty round is never complete.
    pub fn is_complete(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(Match::is_complete)
    }

    /// Every player seated in this round.
    pub fn player_ids(&self) -> HashSet<PlayerId> {
        self.matches.iter().flat_map(Match::all_player_ids).collect()
    }

    /// Number of distinct players seated in this round.
    pub fn total_players(&self) -> usize {
        self.player_ids().len()
    }

    /// Active players from `roster` that sit this round out.
    pub fn benched<'a>(&self, roster: &'a [Player]) -> Vec<&'a Player> {
        let seated = self.player_ids();
        roster
            .iter()
            .filter(|p| p.is_active() && p.id.map_or(true, |id| !seated.contains(&id)))
            .collect()
    }
}

#[cfg(test)]
mod round_tests {
    use super::*;
    use crate::player::Role;

    fn ids(raw: &[u32]) -> Vec<PlayerId> {
        raw.iter().copied().map(PlayerId).collect()
    }

    #[test]
    fn test_valid_formats() {
        assert!(Match::new(0, "A", MatchFormat::Triplette, ids(&[1, 2, 3]), ids(&[4, 5, 6])).is_ok());
        assert!(Match::new(0, "A", MatchFormat::Doublette, ids(&[1, 2]), ids(&[3, 4])).is_ok());
        assert!(Match::new(0, "A", MatchFormat::Hybrid, ids(&[1, 2, 3]), ids(&[4, 5])).is_ok());
        assert!(Match::new(0, "A", MatchFormat::Hybrid, ids(&[1, 2]), ids(&[3, 4, 5])).is_ok());
    }

    #[test]
    fn test_wrong_sizes_rejected() {
        let err = Match::new(0, "A", MatchFormat::Hybrid, ids(&[1, 2, 3]), ids(&[4, 5, 6]));
        assert!(matches!(err, Err(ScheduleError::InvalidMatch(_))));
        assert!(Match::new(0, "A", MatchFormat::Triplette, ids(&[1, 2]), ids(&[3, 4])).is_err());
    }

    #[test]
    fn test_overlap_and_duplicates_rejected() {
        assert!(Match::new(0, "A", MatchFormat::Doublette, ids(&[1, 2]), ids(&[2, 3])).is_err());
        assert!(Match::new(0, "A", MatchFormat::Doublette, ids(&[1, 1]), ids(&[2, 3])).is_err());
        assert!(Match::new(0, "", MatchFormat::Doublette, ids(&[1, 2]), ids(&[3, 4])).is_err());
    }

    #[test]
    fn test_scores() {
        let mut m = Match::new(0, "B", MatchFormat::Doublette, ids(&[1, 2]), ids(&[3, 4])).unwrap();
        assert!(!m.is_complete());
        assert_eq!(m.winner(), None);

        m.record_score(13, 7).unwrap();
        assert!(m.is_complete());
        assert_eq!(m.winner(), Some(&ids(&[1, 2])[..]));

        assert!(m.record_score(14, 2).is_err());
        assert_eq!(m.scores(), Some((13, 7)));

        m.clear_score();
        assert!(!m.is_complete());
    }

    #[test]
    fn test_round_completion() {
        let a = Match::new(1, "A", MatchFormat::Doublette, ids(&[1, 2]), ids(&[3, 4])).unwrap();
        let b = Match::new(1, "B", MatchFormat::Doublette, ids(&[5, 6]), ids(&[7, 8])).unwrap();
        let mut round = Round::new(1, vec![a, b]);
        assert!(!round.is_complete());
        assert_eq!(round.total_players(), 8);

        for m in round.matches_mut() {
            m.record_score(13, 11).unwrap();
        }
        assert!(round.is_complete());
        assert!(!Round::new(2, vec![]).is_complete());
    }

    #[test]
    fn test_benched() {
        let roster = (1..=5)
            .map(|i| {
                Player::new(format!("P{i}"), [Role::Tireur])
                    .unwrap()
                    .with_id(PlayerId(i))
            })
            .collect::<Vec<_>>();
        let m = Match::new(0, "A", MatchFormat::Doublette, ids(&[1, 2]), ids(&[3, 4])).unwrap();
        let round = Round::new(0, vec![m]);
        let benched = round.benched(&roster);
        assert_eq!(benched.len(), 1);
        assert_eq!(benched[0].id, Some(PlayerId(5)));
    }
}
