//! Error types for the fetcher and the HTTP layer.

use activity_engine::{EngineError, RegistryError, RepositoryIdentity};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::types::ErrorBody;

/// A repository fetch failed. Fatal to that fetch; never retried.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("GET {url} returned {status}")]
  Status {
    status: u16,
    url: String,
    message: Option<String>,
  },

  #[error("transport: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("decode {url}: {source}")]
  Decode {
    url: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid event in {url}: {source}")]
  Event {
    url: String,
    #[source]
    source: EngineError,
  },

  #[error("invalid url: {0}")]
  InvalidUrl(String),
}

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{var}: invalid value {value:?}: {reason}")]
  Invalid {
    var: &'static str,
    value: String,
    reason: &'static str,
  },
}

/// Failures while assembling application state at startup.
#[derive(Debug, Error)]
pub enum StateError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Fetch(#[from] FetchError),
}

/// Handler-level failures, mapped onto HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error("minutes must be a non-negative integer, got {0:?}")]
  InvalidMinutes(String),

  #[error("failed to fetch events for {repository}: {source}")]
  Fetch {
    repository: RepositoryIdentity,
    #[source]
    source: FetchError,
  },
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Registry(_) | Self::InvalidMinutes(_) => StatusCode::BAD_REQUEST,
      Self::Fetch { .. } => StatusCode::BAD_GATEWAY,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let repository = match &self {
      Self::Fetch { repository, .. } => Some(repository.to_string()),
      _ => None,
    };
    let body = ErrorBody {
      message: self.to_string(),
      repository,
    };
    (self.status(), Json(body)).into_response()
  }
}
