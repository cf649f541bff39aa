//! Persistence seam between the scheduler and the application around it.
//!
//! The scheduler never reads or writes storage by itself. [`TournamentStore`] is what the
//! surrounding application provides, and [`schedule_next_round`] ties both together: it loads
//! the roster and the rounds played so far, generates the next round and saves it.
//! [`MemoryStore`] keeps everything in memory.

use std::collections::BTreeMap;

use anyhow::{bail, Context};
use tracing::{info, instrument};

use crate::configuration::Configuration;
use crate::player::{Player, PlayerId};
use crate::report::QualityReport;
use crate::round::Round;
use crate::scheduler::Scheduler;

/// Storage of a single tournament.
pub trait TournamentStore {
    /// Saves a new player and returns the id given to it.
    fn add_player(&mut self, player: Player) -> anyhow::Result<PlayerId>;

    /// Player with this id, if any.
    fn get_player(&self, id: PlayerId) -> anyhow::Result<Option<Player>>;

    /// Every player, active or not, in id order.
    fn list_players(&self) -> anyhow::Result<Vec<Player>>;

    /// Replaces the stored player with the same id.
    fn update_player(&mut self, player: Player) -> anyhow::Result<()>;

    /// Removes a player.
    fn delete_player(&mut self, id: PlayerId) -> anyhow::Result<()>;

    /// Saves a generated round.
    fn add_round(&mut self, round: Round) -> anyhow::Result<()>;

    /// Every round, in index order.
    fn list_rounds(&self) -> anyhow::Result<Vec<Round>>;

    /// Removes a round and its matches.
    fn delete_round(&mut self, index: usize) -> anyhow::Result<()>;

    /// Enters the result of the match played on `venue` during round `round_index`.
    fn record_score(
        &mut self,
        round_index: usize,
        venue: &str,
        score_a: u8,
        score_b: u8,
    ) -> anyhow::Result<()>;

    /// Tournament settings. [`schedule_next_round`] only accepts a scheduler built from them.
    fn load_config(&self) -> anyhow::Result<Configuration>;

    /// Replaces the tournament settings.
    fn save_config(&mut self, config: &Configuration) -> anyhow::Result<()>;
}

/// In-memory [`TournamentStore`]. Ids start at 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: BTreeMap<PlayerId, Player>,
    rounds: BTreeMap<usize, Round>,
    config: Configuration,
    last_id: u32,
}

impl MemoryStore {
    /// Empty store with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store with `config`.
    pub fn with_config(config: Configuration) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// True if another player than `except` already uses `name`, ignoring case.
    fn name_taken(&self, name: &str, except: Option<PlayerId>) -> bool {
        let name = name.to_lowercase();
        self.players
            .values()
            .any(|p| p.id != except && p.name().to_lowercase() == name)
    }
}

impl TournamentStore for MemoryStore {
    fn add_player(&mut self, player: Player) -> anyhow::Result<PlayerId> {
        if let Some(id) = player.id {
            bail!("{} already has id {id}", player.name());
        }
        if self.name_taken(player.name(), None) {
            bail!("a player named {} already exists", player.name());
        }

        self.last_id = self
            .last_id
            .checked_add(1)
            .context("no player id left")?;
        let id = PlayerId(self.last_id);
        self.players.insert(id, player.with_id(id));
        Ok(id)
    }

    fn get_player(&self, id: PlayerId) -> anyhow::Result<Option<Player>> {
        Ok(self.players.get(&id).cloned())
    }

    fn list_players(&self) -> anyhow::Result<Vec<Player>> {
        Ok(self.players.values().cloned().collect())
    }

    fn update_player(&mut self, player: Player) -> anyhow::Result<()> {
        let id = player.id.context("cannot update a player without id")?;
        if self.name_taken(player.name(), Some(id)) {
            bail!("a player named {} already exists", player.name());
        }
        let Some(stored) = self.players.get_mut(&id) else {
            bail!("no player with id {id}");
        };
        *stored = player;
        Ok(())
    }

    fn delete_player(&mut self, id: PlayerId) -> anyhow::Result<()> {
        if self
            .rounds
            .values()
            .any(|round| round.player_ids().contains(&id))
        {
            bail!("player {id} already played, deactivate them instead");
        }
        if self.players.remove(&id).is_none() {
            bail!("no player with id {id}");
        }
        Ok(())
    }

    fn add_round(&mut self, round: Round) -> anyhow::Result<()> {
        if self.rounds.contains_key(&round.index()) {
            bail!("round {} already exists", round.index());
        }
        for id in round.player_ids() {
            if !self.players.contains_key(&id) {
                bail!("round {} seats unknown player {id}", round.index());
            }
        }
        self.rounds.insert(round.index(), round);
        Ok(())
    }

    fn list_rounds(&self) -> anyhow::Result<Vec<Round>> {
        Ok(self.rounds.values().cloned().collect())
    }

    fn delete_round(&mut self, index: usize) -> anyhow::Result<()> {
        if self.rounds.remove(&index).is_none() {
            bail!("no round {index}");
        }
        Ok(())
    }

    fn record_score(
        &mut self,
        round_index: usize,
        venue: &str,
        score_a: u8,
        score_b: u8,
    ) -> anyhow::Result<()> {
        let round = self
            .rounds
            .get_mut(&round_index)
            .with_context(|| format!("no round {round_index}"))?;
        let m = round
            .matches_mut()
            .iter_mut()
            .find(|m| m.venue() == venue)
            .with_context(|| format!("no match on venue {venue} in round {round_index}"))?;
        m.record_score(score_a, score_b)?;
        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Configuration> {
        Ok(self.config.clone())
    }

    fn save_config(&mut self, config: &Configuration) -> anyhow::Result<()> {
        config.validate()?;
        self.config = config.clone();
        Ok(())
    }
}

/// Search used by [`schedule_next_round`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStrategy {
    /// [`Scheduler::generate_round`] with the configured attempt budget.
    #[default]
    Heuristic,
    /// [`Scheduler::generate_round_deterministic`].
    Deterministic,
}

/// Generates, saves and returns the round following those already in `store`.
///
/// `scheduler` must have been built from [`TournamentStore::load_config`], so that the number
/// of rounds, the mode and the seed are those of the stored tournament.
///
/// # Errors
/// Fails when the scheduler configuration differs from the stored one, when the tournament
/// already has all its rounds, when generation fails, or when the store does.
#[instrument(skip_all)]
pub fn schedule_next_round<S: TournamentStore + ?Sized>(
    store: &mut S,
    scheduler: &Scheduler,
    strategy: GenerationStrategy,
) -> anyhow::Result<(Round, QualityReport)> {
    if *scheduler.config() != store.load_config()? {
        bail!("the scheduler configuration differs from the stored tournament configuration");
    }
    let players = store.list_players()?;
    let rounds = store.list_rounds()?;
    let index = rounds.len();
    let rounds_count = scheduler.config().rounds_count();
    if index >= rounds_count {
        bail!("the tournament already has its {rounds_count} rounds");
    }

    let (round, report) = match strategy {
        GenerationStrategy::Heuristic => {
            let (round, report, attempts) =
                scheduler.generate_round(&players, index, &rounds, None, None)?;
            info!(round = index, attempts, grade = %report.grade);
            (round, report)
        }
        GenerationStrategy::Deterministic => {
            let (round, report, level) =
                scheduler.generate_round_deterministic(&players, index, &rounds, None)?;
            info!(round = index, %level, grade = %report.grade);
            (round, report)
        }
    };

    store
        .add_round(round.clone())
        .with_context(|| format!("could not save round {index}"))?;
    Ok((round, report))
}
