//! Players and the roles they can hold in a team.

use std::fmt;
use std::hash::Hash;

use crate::error::{Result, ScheduleError};

/// Longest accepted display name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Identifier given by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Positions in a pétanque team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Shooter. Every team needs one.
    Tireur,
    /// Pointer.
    Pointeur,
    /// Middle player, only distinguished in 3-player teams.
    Milieu,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 3] = [Role::Tireur, Role::Pointeur, Role::Milieu];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Tireur => "Tireur",
            Role::Pointeur => "Pointeur",
            Role::Milieu => "Milieu",
        };
        f.write_str(name)
    }
}

/// A registered player.
///
/// `id` stays `None` until the player has been persisted. The scheduler refuses players
/// without an id since history is keyed on it.
///
/// Equality and hashing are by identity: two values with the same `id` and name are the same
/// player, even if one of them has since changed roles or been deactivated.
#[derive(Debug, Clone)]
pub struct Player {
    /// Identifier assigned by the store.
    pub id: Option<PlayerId>,
    name: String,
    roles: Vec<Role>,
    /// Inactive players are skipped when generating rounds.
    pub active: bool,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
    }
}

impl Player {
    /// Creates an active, not yet persisted player.
    ///
    /// The name is trimmed. Duplicated roles are dropped, keeping the first occurrence.
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidPlayer`] for an empty or too long name, or an empty role
    /// list.
    pub fn new(name: impl AsRef<str>, roles: impl IntoIterator<Item = Role>) -> Result<Player> {
        let name = name.as_ref().trim().to_owned();
        if name.is_empty() {
            return Err(ScheduleError::InvalidPlayer("name cannot be empty".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ScheduleError::InvalidPlayer(format!(
                "name '{name}' is longer than {MAX_NAME_LEN} characters"
            )));
        }

        let mut unique = Vec::with_capacity(Role::ALL.len());
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        if unique.is_empty() {
            return Err(ScheduleError::InvalidPlayer(format!(
                "{name} must have at least one role"
            )));
        }

        Ok(Player {
            id: None,
            name,
            roles: unique,
            active: true,
        })
    }

    /// Sets the persistence id.
    #[must_use]
    pub fn with_id(self, id: PlayerId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Marks the player active or inactive.
    #[must_use]
    pub fn with_active(self, active: bool) -> Self {
        Self { active, ..self }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roles this player can hold, without duplicates.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// True if the player may hold `role`.
    pub fn can_play(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True if the player takes part in the next rounds.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn require_id(&self) -> Result<PlayerId> {
        self.id.ok_or_else(|| {
            ScheduleError::InvalidPlayer(format!("{} has not been saved yet (no id)", self.name))
        })
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles = self
            .roles
            .iter()
            .map(Role::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} ({roles})", self.name)
    }
}
