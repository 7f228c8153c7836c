use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::client::DEFAULT_BASE_URL;
use crate::api::endpoints::DEFAULT_SPRITE_BASE_URL;

/// Service configuration, read from the environment with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
    pub sprite_base_url: String,
    pub api_timeout: Duration,
    pub starting_pokedollars: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            api_timeout: Duration::from_millis(10_000),
            starting_pokedollars: 1000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout_ms = parse_or(&lookup, "POKEAPI_TIMEOUT_MS", 10_000u64)?;

        Ok(Self {
            host: lookup("POKEHUNT_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "POKEHUNT_PORT", defaults.port)?,
            api_base_url: lookup("POKEAPI_BASE_URL").unwrap_or(defaults.api_base_url),
            sprite_base_url: lookup("SPRITE_BASE_URL").unwrap_or(defaults.sprite_base_url),
            api_timeout: Duration::from_millis(timeout_ms),
            starting_pokedollars: parse_or(
                &lookup,
                "STARTING_POKEDOLLARS",
                defaults.starting_pokedollars,
            )?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.starting_pokedollars, 1000);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("POKEHUNT_PORT", "8080"),
            ("POKEAPI_BASE_URL", "http://localhost:9000"),
            ("POKEAPI_TIMEOUT_MS", "250"),
            ("STARTING_POKEDOLLARS", "500"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.api_timeout, Duration::from_millis(250));
        assert_eq!(config.starting_pokedollars, 500);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("POKEHUNT_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("POKEHUNT_PORT"));
    }
}
