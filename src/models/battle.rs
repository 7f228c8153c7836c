use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::encounter::{generate_level, scaled_hp};
use super::pokemon::{capitalize, MoveDescriptor, SpeciesData, StatSpread};
use super::trainer::{starting_moves, OwnedCreature, FALLBACK_MOVE};
use super::type_data::{effectiveness, effectiveness_message, CreatureType};
use crate::api::Gateway;
use crate::error::{GameError, Result};

/// A creature as it exists inside one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub types: Vec<CreatureType>,
    pub current_hp: u32,
    pub max_hp: u32,
    pub stats: StatSpread,
    pub level: u32,
    pub moves: Vec<String>,
}

impl Combatant {
    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    fn take_damage(&mut self, damage: u32) {
        self.current_hp = self.current_hp.saturating_sub(damage);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Player,
    Opponent,
}

/// Owned by one session. The session stores it between calls and hands it back for each turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub wild: Combatant,
    pub trainer: Combatant,
    pub turn: Turn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    AwaitingPlayerMove,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOutcome {
    Continue,
    Victory,
    Defeat,
}

/// One side's action within a turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveUse {
    pub move_name: String,
    pub damage: u32,
    pub effectiveness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub player: MoveUse,
    /// `None` when the wild creature fainted before it could act.
    pub opponent: Option<MoveUse>,
    pub outcome: TurnOutcome,
    /// The state to store for the next turn; `None` once the battle is over.
    pub state: Option<BattleState>,
    pub log: Vec<String>,
}

impl TurnResult {
    pub fn phase(&self) -> BattlePhase {
        match self.state {
            Some(_) => BattlePhase::AwaitingPlayerMove,
            None => BattlePhase::Ended,
        }
    }

    pub fn battle_ended(&self) -> bool {
        self.phase() == BattlePhase::Ended
    }

    pub fn message(&self) -> String {
        self.log.join("\n")
    }
}

/// `floor(((2*L/5 + 2) * P * A / D / 50 + 2) * E)`, evaluated left to right in f64.
///
/// Absent power counts as 0. There is no random factor and no same-type bonus.
pub fn calculate_damage(
    level: u32,
    power: Option<u32>,
    attack: u32,
    defense: u32,
    effectiveness: f64,
) -> u32 {
    let level = level as f64;
    let power = power.unwrap_or(0) as f64;
    let attack = attack as f64;
    let defense = (defense as f64).max(1.0);

    let base = (2.0 * level / 5.0 + 2.0) * power * attack / defense / 50.0 + 2.0;
    (base * effectiveness).floor() as u32
}

fn use_move(attacker: &Combatant, defender: &Combatant, battle_move: &MoveDescriptor) -> MoveUse {
    let multiplier = effectiveness(battle_move.move_type, &defender.types);
    let damage = calculate_damage(
        attacker.level,
        battle_move.power,
        attacker.stats.attack,
        defender.stats.defense,
        multiplier,
    );
    MoveUse {
        move_name: battle_move.name.clone(),
        damage,
        effectiveness: multiplier,
    }
}

fn log_move(log: &mut Vec<String>, headline: String, used: &MoveUse) {
    log.push(headline);
    if let Some(msg) = effectiveness_message(used.effectiveness) {
        log.push(msg.to_string());
    }
    log.push(format!("Dealt {} damage!", used.damage));
}

/// Start a battle between the trainer's lead creature and a wild species.
///
/// The trainer side uses the stored level and moves with raw base stats (IVs and EVs are
/// not applied). The wild side gets a generated level, level-scaled HP and the first four
/// moves of its pool.
pub async fn initialize_battle<R: Rng + Send + ?Sized>(
    gateway: &dyn Gateway,
    roster: &[OwnedCreature],
    wild: &SpeciesData,
    rng: &mut R,
) -> Result<BattleState> {
    let lead = roster.first().ok_or(GameError::NoTrainerCreature)?;
    let lead_species = gateway
        .fetch_species(lead.species_id)
        .await
        .map_err(|_| GameError::DataUnavailable(format!("pokemon {}", lead.species_id)))?;

    let wild_level = generate_level(rng);
    let wild_hp = scaled_hp(wild.base_stats.hp, wild_level);

    let trainer_moves = if lead.moves.is_empty() {
        vec![FALLBACK_MOVE.to_string()]
    } else {
        lead.moves.clone()
    };

    let state = BattleState {
        wild: Combatant {
            name: wild.name.clone(),
            types: wild.types.clone(),
            current_hp: wild_hp,
            max_hp: wild_hp,
            stats: wild.base_stats,
            level: wild_level,
            moves: starting_moves(&wild.moves),
        },
        trainer: Combatant {
            name: lead_species.name.clone(),
            types: lead_species.types.clone(),
            current_hp: lead_species.base_stats.hp,
            max_hp: lead_species.base_stats.hp,
            stats: lead_species.base_stats,
            level: lead.level,
            moves: trainer_moves,
        },
        turn: Turn::Player,
    };
    debug!(
        wild = %state.wild.name,
        wild_level,
        wild_hp,
        trainer = %state.trainer.name,
        "battle initialized"
    );
    Ok(state)
}

/// Resolve the player's move and, if the wild creature survives, its reply.
///
/// On error the caller's state is untouched and can be offered again.
pub async fn resolve_turn<R: Rng + Send + ?Sized>(
    gateway: &dyn Gateway,
    state: Option<&BattleState>,
    move_index: usize,
    rng: &mut R,
) -> Result<TurnResult> {
    let state = state.ok_or(GameError::InvalidState)?;
    if state.turn != Turn::Player {
        return Err(GameError::InvalidState);
    }
    let move_name = state
        .trainer
        .moves
        .get(move_index)
        .ok_or(GameError::InvalidMove {
            index: move_index,
            available: state.trainer.moves.len(),
        })?;
    let player_move = gateway
        .fetch_move(move_name)
        .await
        .map_err(|_| GameError::MoveDataUnavailable(move_name.clone()))?;

    let mut next = state.clone();
    let mut log = Vec::new();

    let player = use_move(&next.trainer, &next.wild, &player_move);
    next.wild.take_damage(player.damage);
    log_move(
        &mut log,
        format!("{} used {}!", capitalize(&next.trainer.name), player.move_name),
        &player,
    );
    debug!(
        move_name = %player.move_name,
        damage = player.damage,
        wild_hp = next.wild.current_hp,
        "player attacked"
    );

    if next.wild.is_fainted() {
        log.push(String::new());
        log.push(format!("The wild {} fainted!", capitalize(&next.wild.name)));
        log.push("You won the battle!".to_string());
        return Ok(TurnResult {
            player,
            opponent: None,
            outcome: TurnOutcome::Victory,
            state: None,
            log,
        });
    }

    next.turn = Turn::Opponent;
    let wild_move_name = next
        .wild
        .moves
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| FALLBACK_MOVE.to_string());
    let wild_move = match gateway.fetch_move(&wild_move_name).await {
        Ok(m) => m,
        Err(e) => {
            warn!(
                move_name = %wild_move_name,
                error = %e,
                "opponent move unavailable, using Struggle"
            );
            MoveDescriptor::struggle()
        }
    };

    let opponent = use_move(&next.wild, &next.trainer, &wild_move);
    next.trainer.take_damage(opponent.damage);
    log.push(String::new());
    log_move(
        &mut log,
        format!("Wild {} used {}!", capitalize(&next.wild.name), opponent.move_name),
        &opponent,
    );
    debug!(
        move_name = %opponent.move_name,
        damage = opponent.damage,
        trainer_hp = next.trainer.current_hp,
        "opponent attacked"
    );

    if next.trainer.is_fainted() {
        log.push(String::new());
        log.push(format!("Your {} fainted!", capitalize(&next.trainer.name)));
        log.push("You lost the battle!".to_string());
        return Ok(TurnResult {
            player,
            opponent: Some(opponent),
            outcome: TurnOutcome::Defeat,
            state: None,
            log,
        });
    }

    next.turn = Turn::Player;
    Ok(TurnResult {
        player,
        opponent: Some(opponent),
        outcome: TurnOutcome::Continue,
        state: Some(next),
        log,
    })
}
