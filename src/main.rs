#![allow(dead_code)]

mod api;
mod app;
mod config;
mod error;
mod event;
mod models;
mod render;
mod server;
mod store;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::client::ApiClient;
use app::App;
use config::AppConfig;
use store::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(
        addr = %config.bind_addr(),
        api = %config.api_base_url,
        timeout_ms = config.api_timeout.as_millis() as u64,
        "configuration loaded"
    );

    let gateway = ApiClient::new(config.api_base_url.clone(), config.api_timeout)?;
    let app = App::new(Arc::new(gateway), Arc::new(MemoryStore::new()), &config);

    server::serve(&config, Arc::new(app)).await
}
