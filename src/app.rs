use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::endpoints::sprite_url;
use crate::api::Gateway;
use crate::config::AppConfig;
use crate::error::{GameError, Result};
use crate::event::Command;
use crate::models::battle::{initialize_battle, resolve_turn, BattleState};
use crate::models::capture::{attempt_capture, CaptureOutcome};
use crate::models::encounter::{generate_species_id, generation_of};
use crate::models::pokemon::{capitalize, MoveDescriptor, SpeciesData};
use crate::models::trainer::{NewCreature, Nature};
use crate::render::{ev_yield_map, format_battle_state, format_ev_yields, HUNT_HINT};
use crate::store::{Session, SessionStore, Store};

/// Starter choices offered to new trainers.
pub const STARTERS: [(&str, u32); 3] = [("bulbasaur", 1), ("charmander", 4), ("squirtle", 7)];

const STARTER_LEVEL: u32 = 1;

pub fn starter_id(choice: &str) -> Result<u32> {
    let key = choice.trim().to_lowercase();
    STARTERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, id)| id)
        .ok_or(GameError::UnknownStarter(choice.to_string()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub name: String,
    pub level: u32,
    pub nature: Nature,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainerStats {
    pub name: String,
    pub pokedollars: u32,
    pub pokemon_count: usize,
}

/// What a command returns to the player. Optional parts are omitted from JSON when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandResponse {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pokemon: Option<SpeciesData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_yields: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battle_state: Option<BattleState>,
    pub battle_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<RosterEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TrainerStats>,
}

impl CommandResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// A game outcome the player should retry, not a request failure.
    fn refused(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartGameResponse {
    pub status: Status,
    pub message: String,
    pub session_id: Uuid,
}

/// Command layer between the HTTP surface and the game engine.
///
/// Reads session fields, calls the engine with data from the gateway, then writes results back to
/// the session and the store.
pub struct App {
    gateway: Arc<dyn Gateway>,
    store: Arc<dyn Store>,
    sessions: SessionStore,
    sprite_base_url: String,
    starting_pokedollars: u32,
    seed: Option<Mutex<StdRng>>,
}

impl App {
    pub fn new(gateway: Arc<dyn Gateway>, store: Arc<dyn Store>, config: &AppConfig) -> Self {
        Self {
            gateway,
            store,
            sessions: SessionStore::new(),
            sprite_base_url: config.sprite_base_url.clone(),
            starting_pokedollars: config.starting_pokedollars,
            seed: None,
        }
    }

    /// Draw all randomness from one seeded generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// A fresh generator for one command. `StdRng` is `Send`, so it can be held across awaits.
    fn rng(&self) -> StdRng {
        match &self.seed {
            Some(seeded) => {
                let mut source = seeded.lock().unwrap_or_else(|e| e.into_inner());
                StdRng::from_rng(&mut *source)
            }
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Log in an existing trainer, or register a new one with a level 1 starter.
    pub async fn start_game(
        &self,
        trainer_name: &str,
        starter_choice: Option<&str>,
    ) -> Result<StartGameResponse> {
        let name = trainer_name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidArgument("Trainer name is required".to_string()));
        }

        let (trainer_id, message) = match self.store.find_trainer_by_name(name).await? {
            Some(trainer) => {
                if self.store.creatures_for(trainer.id).await?.is_empty() {
                    return Err(GameError::NoTrainerCreature);
                }
                info!(trainer = %trainer.name, id = trainer.id, "trainer logged in");
                (
                    trainer.id,
                    format!("Welcome back, Trainer {name}! Type /hunt to start catching Pokémon!"),
                )
            }
            None => {
                let species_id = starter_id(starter_choice.unwrap_or_default())?;
                let species = self
                    .gateway
                    .fetch_species(species_id)
                    .await
                    .map_err(|_| GameError::DataUnavailable(format!("pokemon {species_id}")))?;

                let starter = NewCreature::generate(0, &species, STARTER_LEVEL, &mut self.rng());
                let (trainer, owned) = self
                    .store
                    .register_trainer(name, self.starting_pokedollars, starter)
                    .await?;
                info!(
                    trainer = %trainer.name,
                    id = trainer.id,
                    starter = %species.name,
                    nature = %owned.nature,
                    "trainer registered"
                );
                (
                    trainer.id,
                    format!("Welcome, Trainer {name}! Type /hunt to start catching Pokémon!"),
                )
            }
        };

        let session_id = self.sessions.open(trainer_id).await;
        let live = self.sessions.len().await;
        debug!(%session_id, trainer_id, live, "session opened");
        Ok(StartGameResponse {
            status: Status::Success,
            message,
            session_id,
        })
    }

    /// Run one command against a session. Commands for the same session never interleave.
    pub async fn handle_command(&self, session_id: Uuid, input: &str) -> Result<CommandResponse> {
        let handle = self.sessions.get(&session_id).await?;
        let mut session = handle.lock().await;
        let command = match Command::parse(input) {
            Ok(command) => command,
            // a bad move number only matters once there is a battle
            Err(_) if Command::is_move(input) && session.battle.is_none() => {
                return Err(GameError::NoActiveBattle);
            }
            Err(e) => return Err(e),
        };
        debug!(%session_id, %command, "handling command");

        match command {
            Command::Hunt => self.hunt(&mut session).await,
            Command::Battle => self.battle(&mut session).await,
            Command::Move(index) => self.play_move(&mut session, index).await,
            Command::Catch => self.catch(&mut session).await,
            Command::EvYield => self.ev_yield(&session).await,
            Command::MyPokemon => self.my_pokemon(&session).await,
            Command::MyStats => self.my_stats(&session).await,
        }
    }

    async fn hunt(&self, session: &mut Session) -> Result<CommandResponse> {
        let species_id = generate_species_id(&mut self.rng());
        let species = self.gateway.fetch_species(species_id).await?;

        session.encounter = Some(species_id);
        session.battle = None;
        self.store.mark_seen(session.trainer_id, species_id).await?;
        info!(
            trainer_id = session.trainer_id,
            species = %species.name,
            species_id,
            generation = ?generation_of(species_id),
            "wild encounter"
        );

        let message = format!("A wild {} appeared!\n\n{}", capitalize(&species.name), HUNT_HINT);
        Ok(CommandResponse {
            sprite_url: Some(sprite_url(&self.sprite_base_url, species_id)),
            ev_yields: Some(ev_yield_map(&species.effort_yield)),
            pokemon: Some(species),
            ..CommandResponse::success(message)
        })
    }

    async fn battle(&self, session: &mut Session) -> Result<CommandResponse> {
        let species_id = session.encounter.ok_or(GameError::NoEncounter)?;
        let wild = self
            .gateway
            .fetch_species(species_id)
            .await
            .map_err(|_| GameError::DataUnavailable(format!("pokemon {species_id}")))?;
        let roster = self.store.creatures_for(session.trainer_id).await?;

        let mut rng = self.rng();
        let state = initialize_battle(self.gateway.as_ref(), &roster, &wild, &mut rng).await?;
        let moves = self.describe_moves(&state.trainer.moves).await;
        let message = format_battle_state(&state, &moves);

        session.battle = Some(state.clone());
        Ok(CommandResponse {
            battle_state: Some(state),
            ..CommandResponse::success(message)
        })
    }

    async fn play_move(&self, session: &mut Session, index: usize) -> Result<CommandResponse> {
        if session.battle.is_none() {
            return Err(GameError::NoActiveBattle);
        }
        let mut rng = self.rng();
        let result =
            resolve_turn(self.gateway.as_ref(), session.battle.as_ref(), index, &mut rng).await?;

        session.battle = result.state.clone();
        let message = match &result.state {
            Some(next) => {
                let moves = self.describe_moves(&next.trainer.moves).await;
                format!("{}\n\n{}", result.message(), format_battle_state(next, &moves))
            }
            None => {
                session.encounter = None;
                info!(trainer_id = session.trainer_id, outcome = ?result.outcome, "battle ended");
                result.message()
            }
        };

        Ok(CommandResponse {
            battle_state: result.state.clone(),
            battle_ended: result.battle_ended(),
            ..CommandResponse::success(message)
        })
    }

    async fn catch(&self, session: &mut Session) -> Result<CommandResponse> {
        let state = session.battle.as_ref().ok_or(GameError::NoActiveBattle)?;
        let name = capitalize(&state.wild.name);
        let (current, max, level) = (state.wild.current_hp, state.wild.max_hp, state.wild.level);

        let outcome = match attempt_capture(current, max, level, &mut self.rng()) {
            Ok(outcome) => outcome,
            Err(e @ GameError::HpTooHigh { .. }) => {
                return Ok(CommandResponse::refused(format!("Wild {name}'s {e}")));
            }
            Err(e) => return Err(e),
        };

        match outcome {
            CaptureOutcome::Escaped { roll, probability } => {
                debug!(roll, probability, "capture failed");
                Ok(CommandResponse::refused(format!(
                    "Oh no! {name} broke free! (Roll: {roll}, Needed: {probability:.1})"
                )))
            }
            CaptureOutcome::Caught { level } => {
                let species_id = session.encounter.ok_or(GameError::NoEncounter)?;
                let species = self
                    .gateway
                    .fetch_species(species_id)
                    .await
                    .map_err(|_| GameError::DataUnavailable(format!("pokemon {species_id}")))?;
                let creature =
                    NewCreature::generate(session.trainer_id, &species, level, &mut self.rng());
                let owned = self.store.record_capture(creature).await?;

                session.encounter = None;
                session.battle = None;
                info!(
                    trainer_id = session.trainer_id,
                    species = %species.name,
                    level = owned.level,
                    "creature caught"
                );
                Ok(CommandResponse {
                    battle_ended: true,
                    ..CommandResponse::success(format!("Gotcha! {name} was caught!"))
                })
            }
        }
    }

    async fn ev_yield(&self, session: &Session) -> Result<CommandResponse> {
        let species_id = session.encounter.ok_or(GameError::NoEncounter)?;
        let species = self.gateway.fetch_species(species_id).await?;
        Ok(CommandResponse {
            ev_yields: Some(ev_yield_map(&species.effort_yield)),
            ..CommandResponse::success(format_ev_yields(&species.effort_yield))
        })
    }

    async fn my_pokemon(&self, session: &Session) -> Result<CommandResponse> {
        let creatures = self.store.creatures_for(session.trainer_id).await?;
        let mut roster = Vec::with_capacity(creatures.len());
        for creature in creatures {
            // Creatures whose species can't be fetched are left out of the listing.
            if let Ok(species) = self.gateway.fetch_species(creature.species_id).await {
                roster.push(RosterEntry {
                    name: species.name,
                    level: creature.level,
                    nature: creature.nature,
                    moves: creature.moves,
                });
            }
        }

        let mut lines = vec!["Your Pokémon:".to_string()];
        for (i, entry) in roster.iter().enumerate() {
            lines.push(format!(
                "{}. {}  Lv. {}  {}  [{}]",
                i + 1,
                capitalize(&entry.name),
                entry.level,
                entry.nature,
                entry.moves.join(", ")
            ));
        }
        Ok(CommandResponse {
            roster: Some(roster),
            ..CommandResponse::success(lines.join("\n"))
        })
    }

    async fn my_stats(&self, session: &Session) -> Result<CommandResponse> {
        let trainer = self
            .store
            .trainer(session.trainer_id)
            .await?
            .ok_or_else(|| GameError::Storage(format!("trainer {} missing", session.trainer_id)))?;
        let pokemon_count = self.store.creatures_for(trainer.id).await?.len();

        let message = format!(
            "Trainer {}\nPokédollars: {}\nPokémon caught: {}",
            trainer.name, trainer.pokedollars, pokemon_count
        );
        Ok(CommandResponse {
            stats: Some(TrainerStats {
                name: trainer.name,
                pokedollars: trainer.pokedollars,
                pokemon_count,
            }),
            ..CommandResponse::success(message)
        })
    }

    /// Move data for the battle screen, one slot per move name.
    async fn describe_moves(&self, names: &[String]) -> Vec<Option<MoveDescriptor>> {
        let mut moves = Vec::with_capacity(names.len());
        for name in names {
            moves.push(self.gateway.fetch_move(name).await.ok());
        }
        moves
    }
}
