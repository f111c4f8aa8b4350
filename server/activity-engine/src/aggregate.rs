//! Aggregation over event sequences: per-kind counts and mean latency between adjacent kinds.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::warn;

use crate::config::{EventOrder, LatencyOptions, ScanMode};
use crate::filter;
use crate::types::{ActivitySummary, Event, EventKind, EventTypeCounts, PairLatencyTable};

/// Count events per tracked kind. Untracked events are ignored.
pub fn count_by_type(events: &[Event]) -> EventTypeCounts {
  let mut counts = EventTypeCounts::zeroed();
  for kind in events.iter().filter_map(|e| e.kind) {
    counts.increment(kind);
  }
  counts
}

/// Signed seconds `a - b`, millisecond precision.
pub fn elapsed_seconds(a: &DateTime<Utc>, b: &DateTime<Utc>) -> f64 {
  (*a - *b).num_milliseconds() as f64 / 1000.0
}

/// Mean elapsed seconds for every ordered pair of tracked kinds.
///
/// - Returns `None` (and logs) when fewer than two events are supplied.
/// - For each scanned adjacent pair `(i, i+1)`, accumulates
///   `created_at[i] - created_at[i+1]` under `(kind[i], kind[i+1])`.
/// - Pairs touching an untracked event are skipped.
/// - Cells without samples stay undefined.
pub fn mean_latency_by_type_pair(
  events: &[Event],
  options: LatencyOptions,
) -> Option<PairLatencyTable> {
  if events.len() < 2 {
    warn!(
      events = events.len(),
      "insufficient data: need at least two events for pair latency"
    );
    return None;
  }

  let mut ordered: Vec<&Event> = events.iter().collect();
  match options.order {
    EventOrder::AsFetched => {}
    EventOrder::NewestFirst => ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    EventOrder::OldestFirst => ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
  }

  let pair_count = match options.scan {
    ScanMode::Full => ordered.len() - 1,
    ScanMode::SkipLastPair => ordered.len().saturating_sub(2),
  };

  let mut acc: BTreeMap<(EventKind, EventKind), (f64, u64)> = BTreeMap::new();
  for window in ordered.windows(2).take(pair_count) {
    let (current, next) = (window[0], window[1]);
    let (Some(from), Some(to)) = (current.kind, next.kind) else {
      continue;
    };
    let entry = acc.entry((from, to)).or_insert((0.0, 0));
    entry.0 += elapsed_seconds(&current.created_at, &next.created_at);
    entry.1 += 1;
  }

  Some(PairLatencyTable::from_accumulators(&acc))
}

/// Summarize a raw event sequence: totals, trailing-window counts and pair latency
/// over the tracked events.
pub fn summarize(
  events: &[Event],
  window_minutes: i64,
  now: DateTime<Utc>,
  options: LatencyOptions,
) -> ActivitySummary {
  let tracked = filter::restrict_to_tracked_types(events);
  let in_window = filter::restrict_to_window_at(&tracked, window_minutes, now);

  ActivitySummary {
    total: events.len(),
    tracked: tracked.len(),
    window_minutes,
    window_counts: count_by_type(&in_window),
    latency: mean_latency_by_type_pair(&tracked, options),
  }
}
