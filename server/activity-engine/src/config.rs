//! Engine configuration with sane defaults.

use serde::{Deserialize, Serialize};

/// Which adjacent pairs the latency scan visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
  /// Every adjacent pair `(i, i+1)` up to the last element.
  #[default]
  Full,
  /// Stop one pair early, dropping the final adjacent pair (legacy scan).
  SkipLastPair,
}

impl ScanMode {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "full" => Some(Self::Full),
      "skip-last-pair" | "skip_last_pair" | "legacy" => Some(Self::SkipLastPair),
      _ => None,
    }
  }
}

/// Ordering applied to events before the latency scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventOrder {
  /// Keep source order. Newest-first feeds yield negative elapsed values.
  #[default]
  AsFetched,
  /// Sort descending by timestamp; elapsed values are never negative.
  NewestFirst,
  /// Sort ascending by timestamp; elapsed values are never positive.
  OldestFirst,
}

impl EventOrder {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "as-fetched" | "as_fetched" | "source" => Some(Self::AsFetched),
      "newest-first" | "newest_first" | "desc" => Some(Self::NewestFirst),
      "oldest-first" | "oldest_first" | "asc" => Some(Self::OldestFirst),
      _ => None,
    }
  }
}

/// Options for [`crate::aggregate::mean_latency_by_type_pair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LatencyOptions {
  pub scan: ScanMode,
  pub order: EventOrder,
}

/// Tunable limits for tracking and aggregation.
#[derive(Debug, Clone)]
pub struct Config {
  /// Max repositories tracked at once.
  pub registry_capacity: usize,
  /// Max events kept per repository fetch (counted after filtering).
  pub event_cap: usize,
  /// Recency window applied while fetching, in minutes.
  pub recency_window_minutes: i64,
  pub latency: LatencyOptions,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      registry_capacity: 5,
      event_cap: 500,
      recency_window_minutes: crate::filter::LAST_7_DAYS_MINUTES,
      latency: LatencyOptions::default(),
    }
  }
}
