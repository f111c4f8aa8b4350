//! Repository Activity Engine: filtering and aggregation of repository event feeds.
//!
//! Normalizes raw feed records, narrows them to the tracked kinds and trailing
//! windows, counts events per kind, and computes mean latency between adjacent
//! event kinds. Also holds the bounded registry of tracked repositories.
//!
//! No DB, no network; pure computation + in-memory state.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod registry;
pub mod types;

pub use aggregate::{count_by_type, mean_latency_by_type_pair, summarize};
pub use config::{Config, EventOrder, LatencyOptions, ScanMode};
pub use error::{EngineError, RegistryError};
pub use registry::{ApiToken, Registry, TokenUpdate};
pub use types::{
  ActivitySummary, Event, EventKind, EventTypeCounts, InboundEvent, PairLatency, PairLatencyTable,
  RepositoryIdentity,
};
