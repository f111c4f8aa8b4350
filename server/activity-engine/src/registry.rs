//! Bounded, in-memory registry of tracked repositories plus the shared API token.

use std::fmt;
use tracing::info;

use crate::error::RegistryError;
use crate::types::RepositoryIdentity;

/// Bearer credential for the remote event API. Redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
  /// Parse a raw credential, stripping a leading `Bearer` / `token` scheme.
  /// Returns `None` when nothing is left.
  pub fn parse(raw: &str) -> Option<Self> {
    let raw = raw.trim_start();
    let value = strip_scheme(raw, "bearer")
      .or_else(|| strip_scheme(raw, "token"))
      .unwrap_or(raw)
      .trim();
    if value.is_empty() {
      None
    } else {
      Some(Self(value.to_string()))
    }
  }

  pub fn expose(&self) -> &str {
    &self.0
  }
}

fn strip_scheme<'a>(raw: &'a str, scheme: &str) -> Option<&'a str> {
  let (head, rest) = raw.split_at_checked(scheme.len())?;
  if head.eq_ignore_ascii_case(scheme) && rest.starts_with(char::is_whitespace) {
    Some(rest)
  } else {
    None
  }
}

impl fmt::Debug for ApiToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ApiToken(***)")
  }
}

/// Outcome of a successful token update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenUpdate {
  New,
  Unchanged,
}

/// Ordered set of tracked repositories (insertion order) and the shared token.
#[derive(Debug, Clone)]
pub struct Registry {
  capacity: usize,
  repositories: Vec<RepositoryIdentity>,
  token: Option<ApiToken>,
}

impl Registry {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      repositories: Vec::with_capacity(capacity),
      token: None,
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(crate::Config::default().registry_capacity)
  }

  /// Start tracking a repository.
  pub fn add(&mut self, identity: RepositoryIdentity) -> Result<(), RegistryError> {
    if self.repositories.len() >= self.capacity {
      return Err(RegistryError::CapacityExceeded {
        capacity: self.capacity,
      });
    }
    if self.contains(&identity) {
      return Err(RegistryError::AlreadyTracked(identity));
    }
    info!(repository = %identity, "tracking repository");
    self.repositories.push(identity);
    Ok(())
  }

  /// Stop tracking a repository.
  pub fn remove(&mut self, identity: &RepositoryIdentity) -> Result<(), RegistryError> {
    let idx = self
      .repositories
      .iter()
      .position(|r| r == identity)
      .ok_or_else(|| RegistryError::NotFound(identity.clone()))?;
    self.repositories.remove(idx);
    info!(repository = %identity, "stopped tracking repository");
    Ok(())
  }

  pub fn list(&self) -> &[RepositoryIdentity] {
    &self.repositories
  }

  pub fn contains(&self, identity: &RepositoryIdentity) -> bool {
    self.repositories.iter().any(|r| r == identity)
  }

  pub fn len(&self) -> usize {
    self.repositories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.repositories.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Replace the shared token. `None`, empty and scheme-only values are rejected.
  pub fn set_token(&mut self, raw: Option<&str>) -> Result<TokenUpdate, RegistryError> {
    let token = raw.and_then(ApiToken::parse).ok_or(RegistryError::EmptyToken)?;
    if self.token.as_ref() == Some(&token) {
      return Ok(TokenUpdate::Unchanged);
    }
    info!("api token replaced");
    self.token = Some(token);
    Ok(TokenUpdate::New)
  }

  pub fn token(&self) -> Option<&ApiToken> {
    self.token.as_ref()
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::with_defaults()
  }
}
