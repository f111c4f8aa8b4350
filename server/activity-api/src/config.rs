//! Server configuration read from the environment.

use activity_engine::{EventOrder, LatencyOptions, ScanMode};
use std::net::IpAddr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fetcher::FetchConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind_addr: IpAddr,
  pub port: u16,
  /// Token installed at startup, before any `/send-token` call.
  pub initial_token: Option<String>,
  pub fetch: FetchConfig,
  pub latency: LatencyOptions,
  pub registry_capacity: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let engine = activity_engine::Config::default();
    Self {
      bind_addr: IpAddr::from([127, 0, 0, 1]),
      port: 5005,
      initial_token: None,
      fetch: FetchConfig::default(),
      latency: engine.latency,
      registry_capacity: engine.registry_capacity,
    }
  }
}

impl ServerConfig {
  /// Read `PORT`, `BIND_ADDR`, `GITHUB_API_URL`, `GITHUB_TOKEN`, `EVENTS_PER_PAGE`,
  /// `HTTP_TIMEOUT_SECS`, `LATENCY_SCAN` and `LATENCY_ORDER`.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|var| std::env::var(var).ok())
  }

  /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&'static str) -> Option<String>,
  {
    let mut config = Self::default();
    let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("PORT") {
      config.port = v.trim().parse().map_err(|_| invalid("PORT", &v, "expected a u16"))?;
    }
    if let Some(v) = get("BIND_ADDR") {
      config.bind_addr = v
        .trim()
        .parse()
        .map_err(|_| invalid("BIND_ADDR", &v, "expected an IP address"))?;
    }
    if let Some(v) = get("GITHUB_API_URL") {
      config.fetch.api_base = v.trim().to_string();
    }
    config.initial_token = get("GITHUB_TOKEN");
    if let Some(v) = get("EVENTS_PER_PAGE") {
      config.fetch.per_page = v
        .trim()
        .parse()
        .ok()
        .filter(|n| (1..=100).contains(n))
        .ok_or_else(|| invalid("EVENTS_PER_PAGE", &v, "expected 1..=100"))?;
    }
    if let Some(v) = get("HTTP_TIMEOUT_SECS") {
      let secs: u64 = v
        .trim()
        .parse()
        .map_err(|_| invalid("HTTP_TIMEOUT_SECS", &v, "expected seconds"))?;
      config.fetch.timeout = Some(Duration::from_secs(secs));
    }
    if let Some(v) = get("LATENCY_SCAN") {
      config.latency.scan = ScanMode::from_str_loose(&v)
        .ok_or_else(|| invalid("LATENCY_SCAN", &v, "expected full|skip-last-pair"))?;
    }
    if let Some(v) = get("LATENCY_ORDER") {
      config.latency.order = EventOrder::from_str_loose(&v).ok_or_else(|| {
        invalid("LATENCY_ORDER", &v, "expected as-fetched|newest-first|oldest-first")
      })?;
    }

    Ok(config)
  }
}

fn invalid(var: &'static str, value: &str, reason: &'static str) -> ConfigError {
  ConfigError::Invalid {
    var,
    value: value.to_string(),
    reason,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
    let map: HashMap<&'static str, String> =
      pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
    move |var| map.get(var).cloned()
  }

  #[test]
  fn defaults_without_environment() {
    let config = ServerConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config.port, 5005);
    assert_eq!(config.fetch.api_base, "https://api.github.com");
    assert_eq!(config.fetch.per_page, 100);
    assert_eq!(config.fetch.event_cap, 500);
    assert_eq!(config.registry_capacity, 5);
    assert!(config.initial_token.is_none());
  }

  #[test]
  fn overrides_are_applied() {
    let config = ServerConfig::from_lookup(lookup(&[
      ("PORT", "8080"),
      ("BIND_ADDR", "0.0.0.0"),
      ("GITHUB_API_URL", "http://localhost:9000"),
      ("GITHUB_TOKEN", "abc"),
      ("EVENTS_PER_PAGE", "30"),
      ("HTTP_TIMEOUT_SECS", "10"),
      ("LATENCY_SCAN", "skip-last-pair"),
      ("LATENCY_ORDER", "newest-first"),
    ]))
    .unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.bind_addr, IpAddr::from([0, 0, 0, 0]));
    assert_eq!(config.fetch.api_base, "http://localhost:9000");
    assert_eq!(config.initial_token.as_deref(), Some("abc"));
    assert_eq!(config.fetch.per_page, 30);
    assert_eq!(config.fetch.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.latency.scan, ScanMode::SkipLastPair);
    assert_eq!(config.latency.order, EventOrder::NewestFirst);
  }

  #[test]
  fn invalid_values_are_rejected() {
    let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
    assert!(err.to_string().contains("PORT"));
    let err = ServerConfig::from_lookup(lookup(&[("EVENTS_PER_PAGE", "500")])).unwrap_err();
    assert!(err.to_string().contains("EVENTS_PER_PAGE"));
    let err = ServerConfig::from_lookup(lookup(&[("LATENCY_ORDER", "sideways")])).unwrap_err();
    assert!(err.to_string().contains("LATENCY_ORDER"));
  }

  #[test]
  fn blank_values_fall_back_to_defaults() {
    let config = ServerConfig::from_lookup(lookup(&[("PORT", "  "), ("GITHUB_TOKEN", "")])).unwrap();
    assert_eq!(config.port, 5005);
    assert!(config.initial_token.is_none());
  }
}
