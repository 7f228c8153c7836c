use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::app::{App, CommandResponse, StartGameResponse};
use crate::config::AppConfig;
use crate::error::GameError;

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub trainer_name: String,
    /// Only needed when the trainer is new.
    #[serde(default)]
    pub starter_choice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub command: String,
}

/// Routes:
/// - `GET /health`
/// - `POST /api/start-game`
/// - `POST /api/command`
pub fn build_router(app: Arc<App>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/start-game", post(start_game))
        .route("/api/command", post(command))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn health() -> &'static str {
    "ok"
}

async fn start_game(
    State(app): State<Arc<App>>,
    Json(req): Json<StartGameRequest>,
) -> Result<Json<StartGameResponse>, GameError> {
    let response = app
        .start_game(&req.trainer_name, req.starter_choice.as_deref())
        .await?;
    Ok(Json(response))
}

async fn command(
    State(app): State<Arc<App>>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, GameError> {
    let session_id = req.session_id.ok_or(GameError::NoSession)?;
    let response = app.handle_command(session_id, &req.command).await?;
    Ok(Json(response))
}

/// Bind and serve until the process exits.
pub async fn serve(config: &AppConfig, app: Arc<App>) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "pokehunt listening");

    axum::serve(listener, build_router(app))
        .await
        .context("server error")
}
