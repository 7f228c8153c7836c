use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type Result<T> = std::result::Result<T, GameError>;

/// Every failure the game can report. The `Display` text is what the player sees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// Remote species/move data is absent. Transport failures collapse into this too.
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid battle state!")]
    InvalidState,

    #[error("Invalid move! Choose a number between 1 and {available}.")]
    InvalidMove { index: usize, available: usize },

    #[error("No Pokémon found for this trainer")]
    NoTrainerCreature,

    #[error("Failed to start battle: {0} data unavailable")]
    DataUnavailable(String),

    #[error("Move data not found for {0}!")]
    MoveDataUnavailable(String),

    #[error("HP is too high ({current}/{max})! Weaken it further to catch.")]
    HpTooHigh { current: u32, max: u32 },

    #[error("unknown creature type `{0}`")]
    UnknownType(String),

    #[error("No active session")]
    NoSession,

    #[error("No wild Pokémon around! Use /hunt first.")]
    NoEncounter,

    #[error("No active battle! Use /battle first.")]
    NoActiveBattle,

    #[error("Unknown command")]
    UnknownCommand(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unknown starter `{0}`. Pick bulbasaur, charmander or squirtle.")]
    UnknownStarter(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl GameError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoSession => StatusCode::UNAUTHORIZED,
            Self::InvalidMove { .. }
            | Self::UnknownCommand(_)
            | Self::InvalidArgument(_)
            | Self::UnknownStarter(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::UnknownType(_) => StatusCode::NOT_FOUND,
            Self::InvalidState
            | Self::NoTrainerCreature
            | Self::HpTooHigh { .. }
            | Self::NoEncounter
            | Self::NoActiveBattle => StatusCode::CONFLICT,
            Self::DataUnavailable(_) | Self::MoveDataUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
