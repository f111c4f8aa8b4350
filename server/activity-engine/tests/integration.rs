//! Integration tests for the activity engine.

use activity_engine::normalize::normalize_all;
use activity_engine::{
  count_by_type, filter, mean_latency_by_type_pair, summarize, EventKind, InboundEvent,
  LatencyOptions, Registry, RegistryError, RepositoryIdentity, ScanMode,
};
use chrono::{TimeZone, Utc};

fn fixture_page() -> Vec<InboundEvent> {
  let json = r#"[
    {
      "id": "5",
      "type": "WatchEvent",
      "actor": {"id": 1, "login": "octocat"},
      "repo": {"id": 21737465, "name": "sindresorhus/awesome"},
      "payload": {"action": "started"},
      "public": true,
      "created_at": "2025-01-15T11:50:00Z"
    },
    {
      "id": "4",
      "type": "PushEvent",
      "actor": {"login": "sindresorhus"},
      "repo": {"name": "sindresorhus/awesome"},
      "created_at": "2025-01-15T11:45:00Z"
    },
    {
      "id": "3",
      "type": "IssuesEvent",
      "actor": {"login": "hubot"},
      "repo": {"name": "sindresorhus/awesome"},
      "payload": {"action": "opened"},
      "created_at": "2025-01-15T11:40:00Z"
    },
    {
      "id": "2",
      "type": "PullRequestEvent",
      "actor": {"login": "monalisa"},
      "repo": {"name": "sindresorhus/awesome"},
      "created_at": "2025-01-15T11:30:00Z"
    },
    {
      "id": "1",
      "type": "WatchEvent",
      "actor": {"login": "defunkt"},
      "repo": {"name": "sindresorhus/awesome"},
      "created_at": "2025-01-15T09:00:00Z"
    }
  ]"#;
  serde_json::from_str(json).unwrap()
}

#[test]
fn feed_page_normalizes_and_aggregates() {
  let events = normalize_all(&fixture_page()).unwrap();
  assert_eq!(events.len(), 5);

  let tracked = filter::restrict_to_tracked_types(&events);
  assert_eq!(tracked.len(), 4);

  let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
  let last_hour = filter::restrict_to_window_at(&tracked, 60, now);
  let counts = count_by_type(&last_hour);
  assert_eq!(counts.get(EventKind::Watch), 1);
  assert_eq!(counts.get(EventKind::Issues), 1);
  assert_eq!(counts.get(EventKind::PullRequest), 1);

  // Newest-first feed: each elapsed value is positive.
  let table = mean_latency_by_type_pair(&tracked, LatencyOptions::default()).unwrap();
  assert_eq!(table.mean(EventKind::Watch, EventKind::Issues), Some(600.0));
  assert_eq!(table.mean(EventKind::Issues, EventKind::PullRequest), Some(600.0));
  assert_eq!(table.mean(EventKind::PullRequest, EventKind::Watch), Some(9000.0));
}

#[test]
fn legacy_scan_drops_the_oldest_pair() {
  let events = normalize_all(&fixture_page()).unwrap();
  let tracked = filter::restrict_to_tracked_types(&events);
  let options = LatencyOptions {
    scan: ScanMode::SkipLastPair,
    ..LatencyOptions::default()
  };
  let table = mean_latency_by_type_pair(&tracked, options).unwrap();
  assert_eq!(table.mean(EventKind::PullRequest, EventKind::Watch), None);
  assert_eq!(table.mean(EventKind::Issues, EventKind::PullRequest), Some(600.0));
}

#[test]
fn bad_timestamp_fails_the_page() {
  let json = r#"[
    {"type": "WatchEvent", "created_at": "2025-01-15T11:50:00Z"},
    {"type": "WatchEvent", "created_at": "15/01/2025"}
  ]"#;
  let page: Vec<InboundEvent> = serde_json::from_str(json).unwrap();
  let err = normalize_all(&page).unwrap_err();
  assert!(
    err.to_string().contains("created_at"),
    "Error should mention the field: {}",
    err
  );
}

#[test]
fn summary_serializes_undefined_cells_as_null() {
  let events = normalize_all(&fixture_page()).unwrap();
  let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
  let summary = summarize(&events, 60, now, LatencyOptions::default());
  let json = serde_json::to_value(&summary).unwrap();

  assert_eq!(json["total"], 5);
  assert_eq!(json["tracked"], 4);
  assert_eq!(json["window_counts"]["WatchEvent"], 1);
  let cells = json["latency"].as_array().unwrap();
  assert_eq!(cells.len(), 9);
  let watch_watch = cells
    .iter()
    .find(|c| c["from"] == "WatchEvent" && c["to"] == "WatchEvent")
    .unwrap();
  assert!(watch_watch["mean_seconds"].is_null());
  assert_eq!(watch_watch["samples"], 0);
}

#[test]
fn summary_of_single_event_has_null_latency() {
  let events = normalize_all(&fixture_page()[..1]).unwrap();
  let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
  let summary = summarize(&events, 60, now, LatencyOptions::default());
  let json = serde_json::to_value(&summary).unwrap();
  assert!(json["latency"].is_null());
}

#[test]
fn registry_round_trip() {
  let mut registry = Registry::with_defaults();
  let awesome = RepositoryIdentity::new("sindresorhus", "awesome").unwrap();
  registry.add(awesome.clone()).unwrap();
  assert_eq!(
    registry.add(awesome.clone()),
    Err(RegistryError::AlreadyTracked(awesome.clone()))
  );
  registry.remove(&awesome).unwrap();
  assert!(registry.is_empty());
}
