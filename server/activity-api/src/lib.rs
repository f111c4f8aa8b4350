//! Repository Activity API
//!
//! HTTP service that tracks up to five repositories and answers event-count and
//! pair-latency queries by fetching their public event feeds on demand.
//! Bind to 127.0.0.1 by default (internal only).

pub mod config;
pub mod error;
pub mod fetcher;
pub mod handlers;
pub mod state;
pub mod types;

use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use config::ServerConfig;
pub use error::{ApiError, FetchError};
pub use fetcher::{EventFetcher, FetchConfig, FetchedEvents};
pub use state::AppState;

/// Build the router with every endpoint.
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(handlers::index))
    .route("/health", get(handlers::health))
    .route("/add-repository/:owner/:name", post(handlers::add_repository))
    .route("/get-repositories", get(handlers::get_repositories))
    .route("/delete-repository/:owner/:name", delete(handlers::delete_repository))
    .route("/get-event-times", get(handlers::get_event_times))
    .route("/get-events-by-offset/:minutes", get(handlers::get_events_by_offset))
    .route("/send-token", post(handlers::send_token))
    .layer(CorsLayer::permissive())
    .with_state(state)
}
