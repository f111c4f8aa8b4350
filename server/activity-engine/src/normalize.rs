//! Normalize raw feed records into canonical internal Event models.

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::types::*;

/// Parse and normalize an InboundEvent into a canonical Event.
///
/// The type tag and creation timestamp are required; everything else is carried
/// through when present.
pub fn normalize(raw: &InboundEvent) -> Result<Event, EngineError> {
  let event_type = raw
    .event_type
    .as_deref()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or_else(|| EngineError::validation("type", "must not be empty"))?;

  let created_at = match raw.created_at.as_deref() {
    Some(s) => parse_timestamp(s)?,
    None => return Err(EngineError::validation("created_at", "missing")),
  };

  Ok(Event {
    id: non_empty(raw.id.as_deref()),
    event_type: event_type.to_string(),
    kind: EventKind::from_type_tag(event_type),
    created_at,
    actor: non_empty(raw.actor.as_ref().and_then(|a| a.login.as_deref())),
    repo_name: non_empty(raw.repo.as_ref().and_then(|r| r.name.as_deref())),
  })
}

/// Normalize a whole page; the first invalid record fails the page.
pub fn normalize_all(raw: &[InboundEvent]) -> Result<Vec<Event>, EngineError> {
  raw.iter().map(normalize).collect()
}

/// Parse a feed timestamp ("2024-05-01T12:00:00Z") into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, EngineError> {
  DateTime::parse_from_rfc3339(s.trim())
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| EngineError::validation("created_at", &format!("invalid RFC3339: {}", e)))
}

fn non_empty(s: Option<&str>) -> Option<String> {
  s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
