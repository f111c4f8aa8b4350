//! Structured error types for the activity engine.

use thiserror::Error;

use crate::types::RepositoryIdentity;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("parse: {0}")]
  Parse(String),
}

impl EngineError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn parse(msg: impl Into<String>) -> Self {
    Self::Parse(msg.into())
  }
}

/// Rejections from the repository registry. All recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  #[error("cannot track more than {capacity} repositories")]
  CapacityExceeded { capacity: usize },

  #[error("repository {0} is already tracked")]
  AlreadyTracked(RepositoryIdentity),

  #[error("repository {0} is not tracked")]
  NotFound(RepositoryIdentity),

  #[error("token is missing or empty")]
  EmptyToken,

  #[error("invalid repository identity: {0}")]
  InvalidIdentity(String),
}
