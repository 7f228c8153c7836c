use std::fmt;

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pokemon::{SpeciesData, Stat, StatSpread};

/// Used when a species advertises no moves or a record stores none.
pub const FALLBACK_MOVE: &str = "tackle";

pub const MAX_MOVES: usize = 4;

const MAX_IV: u32 = 31;

pub type TrainerId = u64;
pub type CreatureId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: TrainerId,
    /// Unique across trainers.
    pub name: String,
    pub pokedollars: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub const ALL: [Nature; 25] = [
        Nature::Hardy,
        Nature::Lonely,
        Nature::Brave,
        Nature::Adamant,
        Nature::Naughty,
        Nature::Bold,
        Nature::Docile,
        Nature::Relaxed,
        Nature::Impish,
        Nature::Lax,
        Nature::Timid,
        Nature::Hasty,
        Nature::Serious,
        Nature::Jolly,
        Nature::Naive,
        Nature::Modest,
        Nature::Mild,
        Nature::Quiet,
        Nature::Bashful,
        Nature::Rash,
        Nature::Calm,
        Nature::Gentle,
        Nature::Sassy,
        Nature::Careful,
        Nature::Quirky,
    ];
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An owned creature before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCreature {
    pub trainer_id: TrainerId,
    pub species_id: u32,
    pub nickname: Option<String>,
    pub level: u32,
    pub nature: Nature,
    pub ivs: StatSpread,
    pub evs: StatSpread,
    pub moves: Vec<String>,
}

impl NewCreature {
    /// Random nature and IVs, zero EVs, the species' first four moves.
    pub fn generate<R: Rng + ?Sized>(
        trainer_id: TrainerId,
        species: &SpeciesData,
        level: u32,
        rng: &mut R,
    ) -> Self {
        let mut ivs = StatSpread::default();
        for stat in Stat::ALL {
            ivs.set(stat, rng.random_range(0..=MAX_IV));
        }
        let nature = *Nature::ALL.choose(rng).unwrap_or(&Nature::Hardy);

        Self {
            trainer_id,
            species_id: species.id,
            nickname: None,
            level,
            nature,
            ivs,
            evs: StatSpread::default(),
            moves: starting_moves(&species.moves),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedCreature {
    pub id: CreatureId,
    pub trainer_id: TrainerId,
    pub species_id: u32,
    pub nickname: Option<String>,
    pub level: u32,
    pub nature: Nature,
    pub ivs: StatSpread,
    pub evs: StatSpread,
    pub moves: Vec<String>,
}

impl OwnedCreature {
    pub fn from_new(id: CreatureId, new: NewCreature) -> Self {
        Self {
            id,
            trainer_id: new.trainer_id,
            species_id: new.species_id,
            nickname: new.nickname,
            level: new.level,
            nature: new.nature,
            ivs: new.ivs,
            evs: new.evs,
            moves: new.moves,
        }
    }
}

/// At most one per (trainer, species).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexEntry {
    pub trainer_id: TrainerId,
    pub species_id: u32,
    pub seen: bool,
    pub caught: bool,
}

/// First [`MAX_MOVES`] names, or the fallback move when there are none.
pub fn starting_moves(pool: &[String]) -> Vec<String> {
    let moves: Vec<String> = pool.iter().take(MAX_MOVES).cloned().collect();
    if moves.is_empty() {
        vec![FALLBACK_MOVE.to_string()]
    } else {
        moves
    }
}
