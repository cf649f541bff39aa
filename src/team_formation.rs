//! Random, role-aware picking of one team out of the players still available.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, ScheduleError};
use crate::format::{team_slots, MatchFormat, TournamentMode};
use crate::player::{Player, Role};

/// Roster positions of the players able to hold each role.
///
/// A player with several roles appears in several pools. Pools keep roster order.
#[derive(Debug, Clone, Default)]
pub struct RolePools {
    tireur: Vec<usize>,
    pointeur: Vec<usize>,
    milieu: Vec<usize>,
}

impl RolePools {
    /// Splits `roster` by role.
    pub fn new(roster: &[Player]) -> Self {
        let mut pools = Self::default();
        for (index, player) in roster.iter().enumerate() {
            for role in player.roles() {
                pools.pool_mut(*role).push(index);
            }
        }
        pools
    }

    /// Roster positions of the players who can hold `role`.
    pub fn pool(&self, role: Role) -> &[usize] {
        match role {
            Role::Tireur => &self.tireur,
            Role::Pointeur => &self.pointeur,
            Role::Milieu => &self.milieu,
        }
    }

    fn pool_mut(&mut self, role: Role) -> &mut Vec<usize> {
        match role {
            Role::Tireur => &mut self.tireur,
            Role::Pointeur => &mut self.pointeur,
            Role::Milieu => &mut self.milieu,
        }
    }
}

/// Forms teams for one tournament mode.
#[derive(Debug, Clone)]
pub struct TeamFormer {
    mode: TournamentMode,
    pools: RolePools,
}

impl TeamFormer {
    /// Prepares the role pools of `roster`.
    pub fn new(mode: TournamentMode, roster: &[Player]) -> Self {
        Self {
            mode,
            pools: RolePools::new(roster),
        }
    }

    /// Role pools in use.
    pub fn pools(&self) -> &RolePools {
        &self.pools
    }

    /// Picks `team_size` available players forming a role-valid side of a `format` match.
    ///
    /// Slots are filled in order. For each slot the pool of every accepted role is shuffled, in
    /// the slot's priority order, and the first available player not yet in the team is taken.
    /// `available[i]` tells whether roster position `i` can still be picked.
    ///
    /// Returns roster positions in slot order. The roster itself is left untouched.
    ///
    /// # Errors
    /// [`ScheduleError::Infeasible`] as soon as a slot cannot be filled, and
    /// [`ScheduleError::UnsupportedTeamSize`] for a size the format does not have.
    pub fn form_team<R: Rng + ?Sized>(
        &self,
        available: &[bool],
        team_size: usize,
        format: MatchFormat,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let slots = team_slots(self.mode, format, team_size)?;
        let mut team: Vec<usize> = Vec::with_capacity(team_size);

        for slot in &slots {
            let mut picked = None;
            for role in slot.roles() {
                let mut candidates = self.pools.pool(*role).to_vec();
                candidates.shuffle(rng);
                picked = candidates.into_iter().find(|&index| {
                    available.get(index).copied().unwrap_or(false) && !team.contains(&index)
                });
                if picked.is_some() {
                    break;
                }
            }

            match picked {
                Some(index) => team.push(index),
                None => {
                    return Err(ScheduleError::Infeasible(format!(
                        "no available player for slot {slot:?} of a {team_size}-player team"
                    )))
                }
            }
        }

        Ok(team)
    }
}
