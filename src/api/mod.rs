pub mod client;
pub mod endpoints;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::pokemon::{MoveDescriptor, SpeciesData};

/// Read-only source of species and move reference data.
///
/// Any failure (missing resource, transport error, unusable payload) is reported as
/// [`GameError::NotFound`](crate::error::GameError::NotFound). Implementations do not cache or
/// retry.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn fetch_species(&self, id: u32) -> Result<SpeciesData>;

    /// Lookup is case-insensitive; the returned name is the display name.
    async fn fetch_move(&self, name: &str) -> Result<MoveDescriptor>;
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;

    use super::*;
    use crate::error::GameError;
    use crate::models::pokemon::{display_move_name, StatSpread};
    use crate::models::type_data::CreatureType;

    /// In-memory gateway for engine and command tests.
    #[derive(Debug, Default, Clone)]
    pub struct FakeGateway {
        pub species: HashMap<u32, SpeciesData>,
        pub moves: HashMap<String, MoveDescriptor>,
        /// Yield to the runtime before answering, so concurrent callers get a chance to run.
        pub yield_on_fetch: bool,
    }

    impl FakeGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_species(mut self, species: SpeciesData) -> Self {
            self.species.insert(species.id, species);
            self
        }

        pub fn with_move(
            mut self,
            api_name: &str,
            move_type: CreatureType,
            power: Option<u32>,
        ) -> Self {
            self.moves.insert(
                api_name.to_string(),
                MoveDescriptor {
                    name: display_move_name(api_name),
                    move_type,
                    power,
                    accuracy: Some(100),
                    pp: Some(35),
                },
            );
            self
        }
    }

    #[async_trait]
    impl Gateway for FakeGateway {
        async fn fetch_species(&self, id: u32) -> Result<SpeciesData> {
            if self.yield_on_fetch {
                tokio::task::yield_now().await;
            }
            self.species
                .get(&id)
                .cloned()
                .ok_or_else(|| GameError::NotFound(format!("pokemon {id}")))
        }

        async fn fetch_move(&self, name: &str) -> Result<MoveDescriptor> {
            if self.yield_on_fetch {
                tokio::task::yield_now().await;
            }
            self.moves
                .get(&name.to_lowercase())
                .cloned()
                .ok_or_else(|| GameError::NotFound(format!("move {name}")))
        }
    }

    pub fn species(
        id: u32,
        name: &str,
        types: &[CreatureType],
        hp: u32,
        attack: u32,
        defense: u32,
        moves: &[&str],
    ) -> SpeciesData {
        SpeciesData {
            id,
            name: name.to_string(),
            types: types.to_vec(),
            base_stats: StatSpread {
                hp,
                attack,
                defense,
                special_attack: 50,
                special_defense: 50,
                speed: 50,
            },
            effort_yield: StatSpread {
                hp: 1,
                ..StatSpread::default()
            },
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn charmander() -> SpeciesData {
        species(
            4,
            "charmander",
            &[CreatureType::Fire],
            39,
            52,
            43,
            &["scratch", "ember", "growl", "smokescreen", "flamethrower"],
        )
    }

    pub fn bulbasaur() -> SpeciesData {
        species(
            1,
            "bulbasaur",
            &[CreatureType::Grass, CreatureType::Poison],
            45,
            49,
            49,
            &["tackle", "vine-whip"],
        )
    }

    pub fn squirtle() -> SpeciesData {
        species(
            7,
            "squirtle",
            &[CreatureType::Water],
            44,
            48,
            65,
            &["tackle", "water-gun"],
        )
    }

    /// Starters plus the moves they use.
    pub fn starter_gateway() -> FakeGateway {
        FakeGateway::new()
            .with_species(charmander())
            .with_species(bulbasaur())
            .with_species(squirtle())
            .with_move("scratch", CreatureType::Normal, Some(40))
            .with_move("ember", CreatureType::Fire, Some(40))
            .with_move("growl", CreatureType::Normal, None)
            .with_move("smokescreen", CreatureType::Normal, None)
            .with_move("tackle", CreatureType::Normal, Some(40))
            .with_move("vine-whip", CreatureType::Grass, Some(45))
            .with_move("water-gun", CreatureType::Water, Some(40))
    }
}
