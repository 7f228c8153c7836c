use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::error::{GameError, Result};
use crate::models::battle::BattleState;
use crate::models::trainer::{
    CreatureId, DexEntry, NewCreature, OwnedCreature, Trainer, TrainerId,
};

/// Durable records: trainers, owned creatures and dex entries.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_trainer_by_name(&self, name: &str) -> Result<Option<Trainer>>;

    /// Create a trainer together with their first creature. Fails, storing nothing, if the name is
    /// already taken. The starter's `trainer_id` is replaced by the new trainer's id.
    async fn register_trainer(
        &self,
        name: &str,
        pokedollars: u32,
        starter: NewCreature,
    ) -> Result<(Trainer, OwnedCreature)>;

    async fn trainer(&self, id: TrainerId) -> Result<Option<Trainer>>;

    /// In insertion order. The first one leads in battle.
    async fn creatures_for(&self, trainer_id: TrainerId) -> Result<Vec<OwnedCreature>>;

    /// Upsert `seen = true`, keeping `caught` as it was.
    async fn mark_seen(&self, trainer_id: TrainerId, species_id: u32) -> Result<DexEntry>;

    async fn dex_entry(&self, trainer_id: TrainerId, species_id: u32) -> Result<Option<DexEntry>>;

    /// Insert the creature and mark its species caught in one step.
    async fn record_capture(&self, creature: NewCreature) -> Result<OwnedCreature>;
}

#[derive(Debug, Default)]
struct Tables {
    trainers: Vec<Trainer>,
    creatures: Vec<OwnedCreature>,
    dex: HashMap<(TrainerId, u32), DexEntry>,
    next_trainer_id: TrainerId,
    next_creature_id: CreatureId,
}

impl Tables {
    fn upsert_dex(&mut self, trainer_id: TrainerId, species_id: u32, caught: bool) -> DexEntry {
        let entry = self
            .dex
            .entry((trainer_id, species_id))
            .or_insert(DexEntry {
                trainer_id,
                species_id,
                seen: false,
                caught: false,
            });
        entry.seen = true;
        entry.caught |= caught;
        *entry
    }

    fn insert_creature(&mut self, creature: NewCreature) -> Result<OwnedCreature> {
        if !self.trainers.iter().any(|t| t.id == creature.trainer_id) {
            return Err(GameError::Storage(format!(
                "trainer {} does not exist",
                creature.trainer_id
            )));
        }
        self.next_creature_id += 1;
        let owned = OwnedCreature::from_new(self.next_creature_id, creature);
        self.creatures.push(owned.clone());
        Ok(owned)
    }
}

/// Process-local [`Store`]. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_trainer_by_name(&self, name: &str) -> Result<Option<Trainer>> {
        let tables = self.tables.read().await;
        Ok(tables.trainers.iter().find(|t| t.name == name).cloned())
    }

    async fn register_trainer(
        &self,
        name: &str,
        pokedollars: u32,
        mut starter: NewCreature,
    ) -> Result<(Trainer, OwnedCreature)> {
        let mut tables = self.tables.write().await;
        if tables.trainers.iter().any(|t| t.name == name) {
            return Err(GameError::Storage(format!("trainer name {name} is taken")));
        }
        tables.next_trainer_id += 1;
        let trainer = Trainer {
            id: tables.next_trainer_id,
            name: name.to_string(),
            pokedollars,
            created_at: Utc::now(),
        };
        tables.trainers.push(trainer.clone());

        starter.trainer_id = trainer.id;
        let owned = tables.insert_creature(starter)?;
        tables.upsert_dex(trainer.id, owned.species_id, true);
        debug!(id = trainer.id, name, "trainer created");
        Ok((trainer, owned))
    }

    async fn trainer(&self, id: TrainerId) -> Result<Option<Trainer>> {
        let tables = self.tables.read().await;
        Ok(tables.trainers.iter().find(|t| t.id == id).cloned())
    }

    async fn creatures_for(&self, trainer_id: TrainerId) -> Result<Vec<OwnedCreature>> {
        let tables = self.tables.read().await;
        Ok(tables
            .creatures
            .iter()
            .filter(|c| c.trainer_id == trainer_id)
            .cloned()
            .collect())
    }

    async fn mark_seen(&self, trainer_id: TrainerId, species_id: u32) -> Result<DexEntry> {
        Ok(self.tables.write().await.upsert_dex(trainer_id, species_id, false))
    }

    async fn dex_entry(&self, trainer_id: TrainerId, species_id: u32) -> Result<Option<DexEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.dex.get(&(trainer_id, species_id)).copied())
    }

    async fn record_capture(&self, creature: NewCreature) -> Result<OwnedCreature> {
        let mut tables = self.tables.write().await;
        let owned = tables.insert_creature(creature)?;
        tables.upsert_dex(owned.trainer_id, owned.species_id, true);
        Ok(owned)
    }
}

/// Per-player fields carried between commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub trainer_id: TrainerId,
    /// Species id of the current wild encounter.
    pub encounter: Option<u32>,
    pub battle: Option<BattleState>,
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<Uuid, SessionHandle>,
    by_trainer: HashMap<TrainerId, Uuid>,
}

/// Sessions keyed by id, at most one per trainer. Each one has its own lock so commands for a
/// session run one at a time.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<Sessions>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh session for the trainer, closing the one they had before.
    pub async fn open(&self, trainer_id: TrainerId) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            trainer_id,
            ..Session::default()
        };
        let mut sessions = self.sessions.write().await;
        if let Some(previous) = sessions.by_trainer.insert(trainer_id, id) {
            sessions.by_id.remove(&previous);
            debug!(%previous, trainer_id, "previous session closed");
        }
        sessions.by_id.insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: &Uuid) -> Result<SessionHandle> {
        self.sessions
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or(GameError::NoSession)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.by_id.len()
    }
}
