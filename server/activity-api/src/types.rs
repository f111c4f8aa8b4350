//! Request/response bodies for the activity API.

use activity_engine::{EventTypeCounts, PairLatencyTable, RepositoryIdentity};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageBody {
  pub message: String,
}

impl MessageBody {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub repository: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RepositoriesBody {
  pub tracked_repositories: Vec<RepositoryIdentity>,
}

#[derive(Debug, Serialize)]
pub struct RepositoryLatency {
  pub repository: RepositoryIdentity,
  pub events: usize,
  /// `null` when fewer than two events were fetched.
  pub latency: Option<PairLatencyTable>,
}

#[derive(Debug, Serialize)]
pub struct EventTimesBody {
  pub average_times_between_events: Vec<RepositoryLatency>,
}

#[derive(Debug, Serialize)]
pub struct RepositoryCounts {
  pub repository: RepositoryIdentity,
  pub counts: EventTypeCounts,
}

#[derive(Debug, Serialize)]
pub struct EventsByOffsetBody {
  pub minutes: i64,
  pub events_by_type: Vec<RepositoryCounts>,
}
