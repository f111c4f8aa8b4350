//! Event filters: tracked kinds and trailing time windows.
//!
//! All filters preserve input order and never fail; empty input yields empty output.

use chrono::{DateTime, Duration, Utc};

use crate::types::Event;

/// Window used for the "last 7 days" view, in minutes.
pub const LAST_7_DAYS_MINUTES: i64 = 1080;

/// Keep only events of a tracked kind.
pub fn restrict_to_tracked_types(events: &[Event]) -> Vec<Event> {
  events.iter().filter(|e| e.is_tracked()).cloned().collect()
}

/// Keep events created strictly after `now - minutes`, reading the clock once.
pub fn restrict_to_window(events: &[Event], minutes: i64) -> Vec<Event> {
  restrict_to_window_at(events, minutes, Utc::now())
}

/// Keep events created strictly after `now - minutes` for a caller-supplied `now`.
pub fn restrict_to_window_at(events: &[Event], minutes: i64, now: DateTime<Utc>) -> Vec<Event> {
  let threshold = window_threshold(now, minutes);
  events
    .iter()
    .filter(|e| e.created_at > threshold)
    .cloned()
    .collect()
}

pub fn restrict_to_last_7_days(events: &[Event]) -> Vec<Event> {
  restrict_to_window(events, LAST_7_DAYS_MINUTES)
}

/// Earliest excluded instant of a trailing window ending at `now`.
///
/// A window reaching past the representable range saturates to `MIN_UTC`, so every
/// event falls inside it.
pub fn window_threshold(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
  Duration::try_minutes(minutes)
    .and_then(|span| now.checked_sub_signed(span))
    .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// The predicate an event must pass to count toward a fetch cap.
pub fn is_tracked_and_recent(event: &Event, threshold: DateTime<Utc>) -> bool {
  event.is_tracked() && event.created_at > threshold
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
  }

  fn at(minutes_ago: i64, tag: &str) -> Event {
    Event::new(tag, now() - Duration::minutes(minutes_ago))
  }

  #[test]
  fn tracked_types_keep_order_and_drop_others() {
    let events = vec![
      at(1, "WatchEvent"),
      at(2, "PushEvent"),
      at(3, "IssuesEvent"),
      at(4, "ForkEvent"),
      at(5, "PullRequestEvent"),
    ];
    let kept = restrict_to_tracked_types(&events);
    let tags: Vec<&str> = kept.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(tags, vec!["WatchEvent", "IssuesEvent", "PullRequestEvent"]);
  }

  #[test]
  fn tracked_types_is_idempotent() {
    let events = vec![at(1, "WatchEvent"), at(2, "PushEvent"), at(3, "IssuesEvent")];
    let once = restrict_to_tracked_types(&events);
    let twice = restrict_to_tracked_types(&once);
    assert_eq!(once, twice);
  }

  #[test]
  fn window_excludes_older_and_boundary_events() {
    let events = vec![
      at(0, "WatchEvent"),
      at(59, "WatchEvent"),
      at(60, "IssuesEvent"),
      at(61, "PullRequestEvent"),
    ];
    let kept = restrict_to_window_at(&events, 60, now());
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|e| e.event_type == "WatchEvent"));
  }

  #[test]
  fn window_keeps_one_second_inside_boundary() {
    let inside = Event::new("WatchEvent", now() - Duration::minutes(60) + Duration::seconds(1));
    let kept = restrict_to_window_at(&[inside], 60, now());
    assert_eq!(kept.len(), 1);
  }

  #[test]
  fn empty_input_yields_empty_output() {
    assert!(restrict_to_tracked_types(&[]).is_empty());
    assert!(restrict_to_window_at(&[], 60, now()).is_empty());
    assert!(restrict_to_last_7_days(&[]).is_empty());
  }

  #[test]
  fn last_7_days_uses_live_clock() {
    let fresh = Event::new("WatchEvent", Utc::now() - Duration::minutes(5));
    let stale = Event::new("WatchEvent", Utc::now() - Duration::minutes(LAST_7_DAYS_MINUTES + 5));
    let kept = restrict_to_last_7_days(&[fresh.clone(), stale]);
    assert_eq!(kept, vec![fresh]);
  }

  #[test]
  fn oversized_window_keeps_everything() {
    let events = vec![at(1, "WatchEvent"), at(500_000, "IssuesEvent")];
    assert_eq!(restrict_to_window_at(&events, i64::MAX, now()).len(), 2);
    assert_eq!(restrict_to_window_at(&events, 10_000_000_000_000, now()).len(), 2);
    assert_eq!(window_threshold(now(), i64::MAX), DateTime::<Utc>::MIN_UTC);
    assert!(restrict_to_window(&[], i64::MAX).is_empty());
  }

  #[test]
  fn cap_predicate_requires_kind_and_recency() {
    let threshold = window_threshold(now(), 60);
    assert!(is_tracked_and_recent(&at(10, "WatchEvent"), threshold));
    assert!(!is_tracked_and_recent(&at(10, "PushEvent"), threshold));
    assert!(!is_tracked_and_recent(&at(90, "WatchEvent"), threshold));
  }
}
