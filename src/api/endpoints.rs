use async_trait::async_trait;
use tracing::{debug, warn};

use super::client::ApiClient;
use super::Gateway;
use crate::error::{GameError, Result};
use crate::models::pokemon::{MoveDescriptor, MoveDetail, PokemonDetail, SpeciesData};

pub const DEFAULT_SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Static sprite location for a species id. No network call.
pub fn sprite_url(base_url: &str, id: u32) -> String {
    format!("{}/{}.png", base_url.trim_end_matches('/'), id)
}

#[async_trait]
impl Gateway for ApiClient {
    async fn fetch_species(&self, id: u32) -> Result<SpeciesData> {
        let path = format!("/pokemon/{}", id);
        let detail: PokemonDetail = self.get_json(&path).await.map_err(|e| {
            warn!(id, error = %e, "species fetch failed");
            GameError::NotFound(format!("pokemon {id}"))
        })?;
        debug!(id, name = %detail.name, "species fetched");
        SpeciesData::try_from(detail).map_err(|e| {
            warn!(id, error = %e, "species payload unusable");
            GameError::NotFound(format!("pokemon {id}"))
        })
    }

    async fn fetch_move(&self, name: &str) -> Result<MoveDescriptor> {
        let key = name.trim().to_lowercase();
        let path = format!("/move/{}", key);
        let detail: MoveDetail = self.get_json(&path).await.map_err(|e| {
            warn!(name = %key, error = %e, "move fetch failed");
            GameError::NotFound(format!("move {key}"))
        })?;
        MoveDescriptor::try_from(detail).map_err(|e| {
            warn!(name = %key, error = %e, "move payload unusable");
            GameError::NotFound(format!("move {key}"))
        })
    }
}
