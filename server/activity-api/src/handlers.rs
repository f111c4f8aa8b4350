//! HTTP handlers for the activity API.

use activity_engine::{
  count_by_type, filter, mean_latency_by_type_pair, ApiToken, RepositoryIdentity, TokenUpdate,
};
use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::ApiError;
use crate::fetcher::FetchedEvents;
use crate::state::AppState;
use crate::types::*;

pub async fn index() -> &'static str {
  "Repository activity tracker. See /get-repositories, /get-event-times and /get-events-by-offset/{minutes}."
}

pub async fn health() -> &'static str {
  "ok"
}

pub async fn add_repository(
  State(state): State<Arc<AppState>>,
  Path((owner, name)): Path<(String, String)>,
) -> Result<Json<MessageBody>, ApiError> {
  let identity = RepositoryIdentity::new(&owner, &name)?;
  let message = format!("repository {} added", identity);
  state.registry.lock().await.add(identity)?;
  Ok(Json(MessageBody::new(message)))
}

pub async fn get_repositories(State(state): State<Arc<AppState>>) -> Json<RepositoriesBody> {
  let tracked_repositories = state.registry.lock().await.list().to_vec();
  Json(RepositoriesBody {
    tracked_repositories,
  })
}

pub async fn delete_repository(
  State(state): State<Arc<AppState>>,
  Path((owner, name)): Path<(String, String)>,
) -> Result<Json<MessageBody>, ApiError> {
  let identity = RepositoryIdentity::new(&owner, &name)?;
  state.registry.lock().await.remove(&identity)?;
  Ok(Json(MessageBody::new(format!("repository {} deleted", identity))))
}

/// Mean seconds between adjacent event kinds, per tracked repository.
pub async fn get_event_times(
  State(state): State<Arc<AppState>>,
) -> Result<Json<EventTimesBody>, ApiError> {
  let mut average_times_between_events = Vec::new();
  for (repository, fetched) in fetch_all(&state).await? {
    let latency = mean_latency_by_type_pair(&fetched.events, state.latency);
    average_times_between_events.push(RepositoryLatency {
      repository,
      events: fetched.events.len(),
      latency,
    });
  }
  Ok(Json(EventTimesBody {
    average_times_between_events,
  }))
}

/// Event counts per kind over the trailing `minutes`, per tracked repository.
pub async fn get_events_by_offset(
  State(state): State<Arc<AppState>>,
  Path(minutes): Path<String>,
) -> Result<Json<EventsByOffsetBody>, ApiError> {
  let minutes: i64 = minutes
    .trim()
    .parse()
    .ok()
    .filter(|m| *m >= 0)
    .ok_or(ApiError::InvalidMinutes(minutes))?;

  let mut events_by_type = Vec::new();
  for (repository, fetched) in fetch_all(&state).await? {
    let recent = filter::restrict_to_window(&fetched.events, minutes);
    events_by_type.push(RepositoryCounts {
      repository,
      counts: count_by_type(&recent),
    });
  }
  Ok(Json(EventsByOffsetBody {
    minutes,
    events_by_type,
  }))
}

/// Replace the shared token with the request's `Authorization` header.
pub async fn send_token(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Json<MessageBody>, ApiError> {
  let raw = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
  let update = state.registry.lock().await.set_token(raw)?;
  let message = match update {
    TokenUpdate::New => "token set",
    TokenUpdate::Unchanged => "token unchanged",
  };
  Ok(Json(MessageBody::new(message)))
}

/// Fetch every tracked repository, one after another. The first failure aborts the query.
async fn fetch_all(
  state: &AppState,
) -> Result<Vec<(RepositoryIdentity, FetchedEvents)>, ApiError> {
  // Snapshot so the registry lock is not held across network calls.
  let (repositories, token): (Vec<RepositoryIdentity>, Option<ApiToken>) = {
    let registry = state.registry.lock().await;
    (registry.list().to_vec(), registry.token().cloned())
  };

  let mut results = Vec::with_capacity(repositories.len());
  for repository in repositories {
    match state.fetcher.fetch(&repository, token.as_ref()).await {
      Ok(fetched) => {
        info!(repository = %repository, events = fetched.events.len(), "repository included");
        results.push((repository, fetched));
      }
      Err(source) => {
        error!(repository = %repository, error = %source, "fetch failed");
        return Err(ApiError::Fetch { repository, source });
      }
    }
  }
  Ok(results)
}
