//! Shared application state.

use activity_engine::{LatencyOptions, Registry};
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::error::{ConfigError, StateError};
use crate::fetcher::EventFetcher;

pub struct AppState {
  pub registry: Mutex<Registry>,
  pub fetcher: EventFetcher,
  pub latency: LatencyOptions,
}

impl AppState {
  pub fn new(registry: Registry, fetcher: EventFetcher, latency: LatencyOptions) -> Self {
    Self {
      registry: Mutex::new(registry),
      fetcher,
      latency,
    }
  }

  /// Build state from server configuration, installing the initial token if any.
  pub fn from_config(config: &ServerConfig) -> Result<Self, StateError> {
    let mut registry = Registry::new(config.registry_capacity);
    if let Some(token) = config.initial_token.as_deref() {
      registry.set_token(Some(token)).map_err(|_| ConfigError::Invalid {
        var: "GITHUB_TOKEN",
        value: String::new(),
        reason: "token is empty",
      })?;
    }
    let fetcher = EventFetcher::new(config.fetch.clone())?;
    Ok(Self::new(registry, fetcher, config.latency))
  }
}

