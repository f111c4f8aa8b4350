//! Core types for the activity engine (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// Repository identity
// ---------------------------------------------------------------------------

/// An (owner, name) pair naming a remote repository. Compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RepositoryIdentity {
  owner: String,
  name: String,
}

impl RepositoryIdentity {
  /// Build an identity; surrounding whitespace is trimmed, empty parts are rejected.
  pub fn new(owner: impl AsRef<str>, name: impl AsRef<str>) -> Result<Self, RegistryError> {
    let owner = owner.as_ref().trim();
    let name = name.as_ref().trim();
    if owner.is_empty() {
      return Err(RegistryError::InvalidIdentity("owner must not be empty".into()));
    }
    if name.is_empty() {
      return Err(RegistryError::InvalidIdentity("name must not be empty".into()));
    }
    Ok(Self {
      owner: owner.to_string(),
      name: name.to_string(),
    })
  }

  pub fn owner(&self) -> &str {
    &self.owner
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl fmt::Display for RepositoryIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

// ---------------------------------------------------------------------------
// Tracked event kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
  #[serde(rename = "WatchEvent")]
  Watch,
  #[serde(rename = "PullRequestEvent")]
  PullRequest,
  #[serde(rename = "IssuesEvent")]
  Issues,
}

impl EventKind {
  /// All tracked kinds, in table order.
  pub const ALL: [EventKind; 3] = [Self::Watch, Self::PullRequest, Self::Issues];

  /// Map a raw feed type tag to a tracked kind. Exact match, as the feed emits it.
  pub fn from_type_tag(tag: &str) -> Option<Self> {
    match tag {
      "WatchEvent" => Some(Self::Watch),
      "PullRequestEvent" => Some(Self::PullRequest),
      "IssuesEvent" => Some(Self::Issues),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Watch => "WatchEvent",
      Self::PullRequest => "PullRequestEvent",
      Self::Issues => "IssuesEvent",
    }
  }
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: one record of the remote event feed)
// ---------------------------------------------------------------------------

/// One raw record from the repository event feed. Unknown fields are silently ignored.
///
/// `type` and `created_at` are optional here so that a missing value surfaces as a
/// validation error naming the field rather than a generic decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default, rename = "type")]
  pub event_type: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub actor: Option<InboundActor>,
  #[serde(default)]
  pub repo: Option<InboundRepo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundActor {
  #[serde(default)]
  pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundRepo {
  #[serde(default)]
  pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Canonical event after normalization + validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
  pub id: Option<String>,
  /// Raw type tag as emitted by the feed (may be an untracked kind).
  pub event_type: String,
  pub kind: Option<EventKind>,
  pub created_at: DateTime<Utc>,
  pub actor: Option<String>,
  pub repo_name: Option<String>,
}

impl Event {
  pub fn new(event_type: impl Into<String>, created_at: DateTime<Utc>) -> Self {
    let event_type = event_type.into();
    Self {
      id: None,
      kind: EventKind::from_type_tag(&event_type),
      event_type,
      created_at,
      actor: None,
      repo_name: None,
    }
  }

  pub fn is_tracked(&self) -> bool {
    self.kind.is_some()
  }
}

// ---------------------------------------------------------------------------
// Aggregation results (JSON contract: what we emit)
// ---------------------------------------------------------------------------

/// Count per tracked kind; always holds all three kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventTypeCounts(BTreeMap<EventKind, u64>);

impl EventTypeCounts {
  pub fn zeroed() -> Self {
    Self(EventKind::ALL.iter().map(|k| (*k, 0)).collect())
  }

  pub fn get(&self, kind: EventKind) -> u64 {
    self.0.get(&kind).copied().unwrap_or(0)
  }

  pub fn increment(&mut self, kind: EventKind) {
    *self.0.entry(kind).or_insert(0) += 1;
  }

  pub fn total(&self) -> u64 {
    self.0.values().sum()
  }

  pub fn iter(&self) -> impl Iterator<Item = (EventKind, u64)> + '_ {
    self.0.iter().map(|(k, v)| (*k, *v))
  }
}

impl Default for EventTypeCounts {
  fn default() -> Self {
    Self::zeroed()
  }
}

/// Mean elapsed seconds for one ordered kind pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairLatency {
  pub from: EventKind,
  pub to: EventKind,
  pub samples: u64,
  /// `None` when the pair never occurred adjacently.
  pub mean_seconds: Option<f64>,
}

/// All nine ordered kind pairs, in `EventKind::ALL` x `EventKind::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PairLatencyTable {
  cells: Vec<PairLatency>,
}

impl PairLatencyTable {
  /// Build from per-pair (sum, samples) accumulators. Missing pairs become undefined cells.
  pub(crate) fn from_accumulators(acc: &BTreeMap<(EventKind, EventKind), (f64, u64)>) -> Self {
    let mut cells = Vec::with_capacity(EventKind::ALL.len() * EventKind::ALL.len());
    for from in EventKind::ALL {
      for to in EventKind::ALL {
        let (sum, samples) = acc.get(&(from, to)).copied().unwrap_or((0.0, 0));
        let mean_seconds = if samples > 0 {
          Some(sum / samples as f64)
        } else {
          None
        };
        cells.push(PairLatency {
          from,
          to,
          samples,
          mean_seconds,
        });
      }
    }
    Self { cells }
  }

  pub fn get(&self, from: EventKind, to: EventKind) -> Option<&PairLatency> {
    self.cells.iter().find(|c| c.from == from && c.to == to)
  }

  /// Mean elapsed seconds for `from` immediately followed by `to`, if observed.
  pub fn mean(&self, from: EventKind, to: EventKind) -> Option<f64> {
    self.get(from, to).and_then(|c| c.mean_seconds)
  }

  pub fn iter(&self) -> impl Iterator<Item = &PairLatency> {
    self.cells.iter()
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }
}

/// One-shot summary of an event sequence.
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
  pub total: usize,
  pub tracked: usize,
  pub window_minutes: i64,
  pub window_counts: EventTypeCounts,
  /// `None` when fewer than two tracked events were available.
  pub latency: Option<PairLatencyTable>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for invalid input lines.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line: Option<usize>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
      line: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }

  pub fn at_line(mut self, line: usize) -> Self {
    self.line = Some(line);
    self
  }
}
