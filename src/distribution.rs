//! How many matches of each format seat a roster with as few benched players as possible.

use std::fmt;

use crate::format::{MatchFormat, TournamentMode};

/// Fewest players a round can seat.
pub const MIN_PLAYERS: usize = 4;

/// Number of matches of each format in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MatchDistribution {
    /// 3v3 matches.
    pub triplette: usize,
    /// 2v2 matches.
    pub doublette: usize,
    /// 3v2 matches.
    pub hybrid: usize,
}

impl MatchDistribution {
    /// Builds a distribution from `(triplette, doublette, hybrid)` counts.
    pub const fn new(triplette: usize, doublette: usize, hybrid: usize) -> Self {
        Self {
            triplette,
            doublette,
            hybrid,
        }
    }

    /// Players seated by these matches.
    pub fn seated(&self) -> usize {
        self.triplette * MatchFormat::Triplette.seats()
            + self.doublette * MatchFormat::Doublette.seats()
            + self.hybrid * MatchFormat::Hybrid.seats()
    }

    /// Total number of matches.
    pub fn match_count(&self) -> usize {
        self.triplette + self.doublette + self.hybrid
    }

    /// True when nothing can be scheduled.
    pub fn is_empty(&self) -> bool {
        self.match_count() == 0
    }

    /// Formats of every match, 3v3 first, then 2v2, then hybrids.
    pub fn formats(&self) -> Vec<MatchFormat> {
        let repeat = |format, count| std::iter::repeat(format).take(count);
        repeat(MatchFormat::Triplette, self.triplette)
            .chain(repeat(MatchFormat::Doublette, self.doublette))
            .chain(repeat(MatchFormat::Hybrid, self.hybrid))
            .collect()
    }

    fn preferred(&self, mode: TournamentMode) -> usize {
        match mode {
            TournamentMode::Triplette => self.triplette,
            TournamentMode::Doublette => self.doublette,
        }
    }

    /// On equal seating: more matches in the preferred format, then fewer hybrids.
    fn is_better_tie(&self, other: &Self, mode: TournamentMode) -> bool {
        let (mine, theirs) = (self.preferred(mode), other.preferred(mode));
        mine > theirs || (mine == theirs && self.hybrid < other.hybrid)
    }
}

impl fmt::Display for MatchDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "3v3={}, 2v2={}, 3v2={}",
            self.triplette, self.doublette, self.hybrid
        )
    }
}

/// Mix of 3v3, 2v2 and 3v2 matches seating the most of `player_count` players.
///
/// Ties are broken in favour of the mode's preferred format, then of fewer hybrids. Fewer than
/// [`MIN_PLAYERS`] players gives an empty distribution.
pub fn optimal_distribution(player_count: usize, mode: TournamentMode) -> MatchDistribution {
    if player_count < MIN_PLAYERS {
        return MatchDistribution::default();
    }

    let mut best = MatchDistribution::default();
    let mut best_bench = player_count;

    for triplette in 0..=player_count / MatchFormat::Triplette.seats() {
        for doublette in 0..=player_count / MatchFormat::Doublette.seats() {
            for hybrid in 0..=player_count / MatchFormat::Hybrid.seats() {
                let candidate = MatchDistribution::new(triplette, doublette, hybrid);
                let Some(bench) = player_count.checked_sub(candidate.seated()) else {
                    continue;
                };
                let better = bench < best_bench
                    || (bench == best_bench && candidate.is_better_tie(&best, mode));
                if better {
                    best = candidate;
                    best_bench = bench;
                }
            }
        }
    }

    best
}

/// Players needed in each role to fill the teams of the optimal distribution.
///
/// Advisory only: the scheduler never reads it. A 3-player team needs one of each role, a
/// 2-player team needs a Tireur and a flexible Pointeur-or-Milieu player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirements {
    /// Mode the requirements were computed for.
    pub mode: TournamentMode,
    /// Roster size.
    pub total_players: usize,
    /// Tireur slots.
    pub tireur_needed: usize,
    /// Pointeur slots.
    pub pointeur_needed: usize,
    /// Milieu slots.
    pub milieu_needed: usize,
    /// Pointeur-or-Milieu slots.
    pub flexible_needed: usize,
    /// 3v3 matches.
    pub triplette_matches: usize,
    /// 2v2 matches.
    pub doublette_matches: usize,
    /// 3v2 matches.
    pub hybrid_matches: usize,
}

impl RoleRequirements {
    /// 3-player teams, hybrid sides included.
    pub fn triplette_teams(&self) -> usize {
        self.triplette_matches * 2 + self.hybrid_matches
    }

    /// 2-player teams, hybrid sides included.
    pub fn doublette_teams(&self) -> usize {
        self.doublette_matches * 2 + self.hybrid_matches
    }

    /// Players seated when every slot is filled.
    pub fn total_needed(&self) -> usize {
        self.triplette_teams() * 3 + self.doublette_teams() * 2
    }

    /// Players left out of every round.
    pub fn benched(&self) -> usize {
        self.total_players - self.total_needed()
    }
}

/// Role slots implied by [`optimal_distribution`] for `player_count` players.
pub fn role_requirements(mode: TournamentMode, player_count: usize) -> RoleRequirements {
    let distribution = optimal_distribution(player_count, mode);
    let triplette_teams = distribution.triplette * 2 + distribution.hybrid;
    let doublette_teams = distribution.doublette * 2 + distribution.hybrid;

    RoleRequirements {
        mode,
        total_players: player_count,
        tireur_needed: triplette_teams + doublette_teams,
        pointeur_needed: triplette_teams,
        milieu_needed: triplette_teams,
        flexible_needed: doublette_teams,
        triplette_matches: distribution.triplette,
        doublette_matches: distribution.doublette,
        hybrid_matches: distribution.hybrid,
    }
}

#[cfg(test)]
mod distribution_tests {
    use super::*;

    const MODES: [TournamentMode; 2] = [TournamentMode::Triplette, TournamentMode::Doublette];

    #[test]
    fn test_small_rosters() {
        for mode in MODES {
            for n in 0..MIN_PLAYERS {
                assert!(optimal_distribution(n, mode).is_empty());
            }
        }
    }

    #[test]
    fn test_known_counts() {
        let mode = TournamentMode::Triplette;
        assert_eq!(optimal_distribution(5, mode), MatchDistribution::new(0, 0, 1));
        assert_eq!(optimal_distribution(6, mode), MatchDistribution::new(1, 0, 0));
        assert_eq!(optimal_distribution(7, mode), MatchDistribution::new(1, 0, 0));
        assert_eq!(optimal_distribution(8, mode), MatchDistribution::new(0, 2, 0));
        assert_eq!(optimal_distribution(10, mode), MatchDistribution::new(1, 1, 0));
        assert_eq!(optimal_distribution(11, mode), MatchDistribution::new(1, 0, 1));
        assert_eq!(optimal_distribution(12, mode), MatchDistribution::new(2, 0, 0));
    }

    #[test]
    fn test_doublette_prefers_2v2() {
        let mode = TournamentMode::Doublette;
        assert_eq!(optimal_distribution(12, mode), MatchDistribution::new(0, 3, 0));
        assert_eq!(optimal_distribution(8, mode), MatchDistribution::new(0, 2, 0));
        assert_eq!(optimal_distribution(5, mode), MatchDistribution::new(0, 0, 1));
    }

    #[test]
    fn test_seating_is_maximal() {
        for mode in MODES {
            for n in MIN_PLAYERS..=60 {
                let d = optimal_distribution(n, mode);
                assert!(d.seated() <= n, "{n} players: {d}");
                // only 7 players cannot all be seated (4, 5, 6 and every n >= 8 can)
                let expected = if n == 7 { 6 } else { n };
                assert_eq!(d.seated(), expected, "{n} players: {d}");
            }
        }
    }

    #[test]
    fn test_formats_order() {
        let d = MatchDistribution::new(1, 2, 1);
        assert_eq!(
            d.formats(),
            vec![
                MatchFormat::Triplette,
                MatchFormat::Doublette,
                MatchFormat::Doublette,
                MatchFormat::Hybrid
            ]
        );
    }

    #[test]
    fn test_role_requirements_triplette() {
        let req = role_requirements(TournamentMode::Triplette, 12);
        assert_eq!(req.tireur_needed, 4);
        assert_eq!(req.pointeur_needed, 4);
        assert_eq!(req.milieu_needed, 4);
        assert_eq!(req.flexible_needed, 0);
        assert_eq!(req.total_needed(), 12);
        assert_eq!(req.benched(), 0);
    }

    #[test]
    fn test_role_requirements_hybrid() {
        let req = role_requirements(TournamentMode::Triplette, 5);
        assert_eq!(req.hybrid_matches, 1);
        assert_eq!(req.triplette_matches, 0);
        assert_eq!(req.tireur_needed, 2);
        assert_eq!(req.pointeur_needed, 1);
        assert_eq!(req.milieu_needed, 1);
        assert_eq!(req.flexible_needed, 1);
    }

    #[test]
    fn test_role_requirements_doublette() {
        let req = role_requirements(TournamentMode::Doublette, 8);
        assert_eq!(req.tireur_needed, 4);
        assert_eq!(req.flexible_needed, 4);
        assert_eq!(req.milieu_needed, 0);
        assert_eq!(req.doublette_teams(), 4);
    }
}
