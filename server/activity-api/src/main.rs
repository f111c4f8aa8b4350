//! Binary entrypoint for the activity API.

use std::net::SocketAddr;
use std::sync::Arc;

use activity_api::{AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let config = ServerConfig::from_env()?;
  let state = Arc::new(AppState::from_config(&config)?);
  let app = activity_api::router(state);

  let addr = SocketAddr::new(config.bind_addr, config.port);
  tracing::info!(
    api = %config.fetch.api_base,
    scan = ?config.latency.scan,
    order = ?config.latency.order,
    "activity-api listening on http://{}",
    addr
  );

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
