//! Tournament modes, match formats and the role shape of a team.
//!
//! A team is described by an ordered list of [`Slot`]s. Each slot is either a fixed role or a
//! group of alternative roles tried in priority order. The shape only depends on the team size
//! and on the tournament's preferred mode:
//!
//! | team size | Triplette mode                    | Doublette mode                           |
//! |-----------|-----------------------------------|------------------------------------------|
//! | 3         | Tireur, Pointeur, Milieu          | Tireur, Pointeur/Milieu, Pointeur/Milieu |
//! | 2         | Tireur, Pointeur/Milieu           | Tireur, Pointeur/Milieu                  |

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScheduleError};
use crate::player::{Player, Role};

/// Team size the tournament favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TournamentMode {
    /// 3 versus 3.
    #[default]
    Triplette,
    /// 2 versus 2.
    Doublette,
}

impl TournamentMode {
    /// The match format this mode prefers.
    pub fn preferred_format(self) -> MatchFormat {
        match self {
            TournamentMode::Triplette => MatchFormat::Triplette,
            TournamentMode::Doublette => MatchFormat::Doublette,
        }
    }

    /// True for any format other than the preferred one. Hybrid matches are always a fallback.
    pub fn is_fallback(self, format: MatchFormat) -> bool {
        format != self.preferred_format()
    }
}

impl fmt::Display for TournamentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentMode::Triplette => f.write_str("Triplette"),
            TournamentMode::Doublette => f.write_str("Doublette"),
        }
    }
}

impl FromStr for TournamentMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s.eq_ignore_ascii_case("triplette") {
            Ok(TournamentMode::Triplette)
        } else if s.eq_ignore_ascii_case("doublette") {
            Ok(TournamentMode::Doublette)
        } else {
            anyhow::bail!("unknown tournament mode '{s}' (expected triplette or doublette)")
        }
    }
}

/// How many players face each other in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchFormat {
    /// 3v3, seats 6.
    Triplette,
    /// 2v2, seats 4.
    Doublette,
    /// 3v2 in either order, seats 5.
    Hybrid,
}

impl MatchFormat {
    /// Players seated by one match of this format.
    pub fn seats(self) -> usize {
        match self {
            MatchFormat::Triplette => 6,
            MatchFormat::Doublette => 4,
            MatchFormat::Hybrid => 5,
        }
    }

    /// True if `(size_a, size_b)` is a legal pair of team sizes for this format.
    pub fn accepts_sizes(self, size_a: usize, size_b: usize) -> bool {
        match self {
            MatchFormat::Triplette => size_a == 3 && size_b == 3,
            MatchFormat::Doublette => size_a == 2 && size_b == 2,
            MatchFormat::Hybrid => matches!((size_a, size_b), (3, 2) | (2, 3)),
        }
    }

    /// True if one side of this format may have `size` players.
    pub fn accepts_team_size(self, size: usize) -> bool {
        match self {
            MatchFormat::Triplette => size == 3,
            MatchFormat::Doublette => size == 2,
            MatchFormat::Hybrid => size == 2 || size == 3,
        }
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFormat::Triplette => f.write_str("Triplette"),
            MatchFormat::Doublette => f.write_str("Doublette"),
            MatchFormat::Hybrid => f.write_str("Hybrid (3v2)"),
        }
    }
}

const POINTEUR_OR_MILIEU: &[Role] = &[Role::Pointeur, Role::Milieu];

/// One position to fill in a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Exactly this role.
    Fixed(Role),
    /// Any of these roles, in priority order.
    AnyOf(&'static [Role]),
}

impl Slot {
    /// Roles that can fill this slot, in priority order.
    pub fn roles(&self) -> &[Role] {
        match self {
            Slot::Fixed(role) => std::slice::from_ref(role),
            Slot::AnyOf(roles) => roles,
        }
    }

    /// True if `player` can fill this slot.
    pub fn accepts(&self, player: &Player) -> bool {
        self.roles().iter().any(|role| player.can_play(*role))
    }
}

/// Slots making up a team of `team_size` players in a `format` match.
///
/// # Errors
/// [`ScheduleError::UnsupportedTeamSize`] when the format has no side of that size.
pub fn team_slots(mode: TournamentMode, format: MatchFormat, team_size: usize) -> Result<Vec<Slot>> {
    if !format.accepts_team_size(team_size) {
        return Err(ScheduleError::UnsupportedTeamSize {
            size: team_size,
            format,
        });
    }

    let slots = match (team_size, mode) {
        (3, TournamentMode::Triplette) => vec![
            Slot::Fixed(Role::Tireur),
            Slot::Fixed(Role::Pointeur),
            Slot::Fixed(Role::Milieu),
        ],
        (3, TournamentMode::Doublette) => vec![
            Slot::Fixed(Role::Tireur),
            Slot::AnyOf(POINTEUR_OR_MILIEU),
            Slot::AnyOf(POINTEUR_OR_MILIEU),
        ],
        _ => vec![Slot::Fixed(Role::Tireur), Slot::AnyOf(POINTEUR_OR_MILIEU)],
    };
    Ok(slots)
}

/// True if the players can be put one-to-one onto `slots`.
pub fn fits_slots(players: &[&Player], slots: &[Slot]) -> bool {
    fn assign(players: &[&Player], slots: &[Slot], taken: &mut Vec<bool>) -> bool {
        let Some((slot, rest)) = slots.split_first() else {
            return true;
        };
        for (i, player) in players.iter().enumerate() {
            if taken[i] || !slot.accepts(player) {
                continue;
            }
            taken[i] = true;
            if assign(players, rest, taken) {
                return true;
            }
            taken[i] = false;
        }
        false
    }

    if players.len() != slots.len() {
        return false;
    }
    let mut taken = vec![false; players.len()];
    assign(players, slots, &mut taken)
}

/// True if `team` is a role-valid side of `team.len()` players for `format` under `mode`.
pub fn is_valid_team(team: &[&Player], format: MatchFormat, mode: TournamentMode) -> bool {
    match team_slots(mode, format, team.len()) {
        Ok(slots) => fits_slots(team, &slots),
        Err(_) => false,
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    fn player(name: &str, roles: &[Role]) -> Player {
        Player::new(name, roles.iter().copied()).unwrap()
    }

    #[test]
    fn test_fallback() {
        let mode = TournamentMode::Triplette;
        assert!(!mode.is_fallback(MatchFormat::Triplette));
        assert!(mode.is_fallback(MatchFormat::Doublette));
        assert!(mode.is_fallback(MatchFormat::Hybrid));
        assert!(TournamentMode::Doublette.is_fallback(MatchFormat::Triplette));
    }

    #[test]
    fn test_sizes() {
        assert!(MatchFormat::Hybrid.accepts_sizes(2, 3));
        assert!(MatchFormat::Hybrid.accepts_sizes(3, 2));
        assert!(!MatchFormat::Hybrid.accepts_sizes(3, 3));
        assert!(!MatchFormat::Triplette.accepts_sizes(3, 2));
        assert_eq!(MatchFormat::Hybrid.seats(), 5);
    }

    #[test]
    fn test_slots_depend_on_mode() {
        let slots = team_slots(TournamentMode::Triplette, MatchFormat::Triplette, 3).unwrap();
        assert_eq!(slots[2], Slot::Fixed(Role::Milieu));
        let slots = team_slots(TournamentMode::Doublette, MatchFormat::Hybrid, 3).unwrap();
        assert_eq!(slots[1].roles(), &[Role::Pointeur, Role::Milieu]);
        assert!(team_slots(TournamentMode::Doublette, MatchFormat::Doublette, 3).is_err());
    }

    #[test]
    fn test_valid_triplette_team() {
        let t = player("T", &[Role::Tireur]);
        let p = player("P", &[Role::Pointeur]);
        let m = player("M", &[Role::Milieu]);
        let mode = TournamentMode::Triplette;
        assert!(is_valid_team(&[&t, &p, &m], MatchFormat::Triplette, mode));

        let t2 = player("T2", &[Role::Tireur]);
        assert!(!is_valid_team(&[&t, &t2, &m], MatchFormat::Triplette, mode));
    }

    #[test]
    fn test_assignment_is_one_to_one() {
        // Only `all` can be Pointeur or Milieu: counting roles would accept this team.
        let all = player("All", &[Role::Tireur, Role::Pointeur, Role::Milieu]);
        let t1 = player("T1", &[Role::Tireur]);
        let t2 = player("T2", &[Role::Tireur]);
        assert!(!is_valid_team(
            &[&all, &t1, &t2],
            MatchFormat::Triplette,
            TournamentMode::Triplette
        ));
    }

    #[test]
    fn test_valid_doublette_team() {
        let t = player("T", &[Role::Tireur]);
        let m = player("M", &[Role::Milieu]);
        let p = player("P", &[Role::Pointeur]);
        let mode = TournamentMode::Doublette;
        assert!(is_valid_team(&[&m, &t], MatchFormat::Doublette, mode));
        assert!(!is_valid_team(&[&m, &p], MatchFormat::Doublette, mode));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "DOUBLETTE".parse::<TournamentMode>().unwrap(),
            TournamentMode::Doublette
        );
        assert!("quadrette".parse::<TournamentMode>().is_err());
    }
}
