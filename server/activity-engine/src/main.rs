//! Binary entrypoint: read feed records as JSON lines from stdin, write one summary to stdout.
//!
//! Usage: `activity-engine [window-minutes]` (default 60).
//!
//! Each input line is one InboundEvent. Invalid lines produce an ErrorOutput line and
//! are skipped; the final line is the ActivitySummary of all valid events.

use activity_engine::types::ErrorOutput;
use activity_engine::{normalize, summarize, Config, EngineError, InboundEvent};
use chrono::Utc;
use std::io::{self, BufRead, Write};

const DEFAULT_WINDOW_MINUTES: i64 = 60;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(io::stderr)
    .init();

  if let Err(e) = run() {
    let _ = writeln!(io::stderr(), "activity-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
  let window_minutes = match std::env::args().nth(1) {
    Some(arg) => arg
      .parse::<i64>()
      .ok()
      .filter(|m| *m >= 0)
      .ok_or_else(|| EngineError::parse(format!("invalid window minutes: {}", arg)))?,
    None => DEFAULT_WINDOW_MINUTES,
  };

  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  let mut events = Vec::new();

  for (idx, line) in stdin.lock().lines().enumerate() {
    let line = line?;
    let line_no = idx + 1;

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let raw: InboundEvent = match serde_json::from_str(trimmed) {
      Ok(v) => v,
      Err(e) => {
        let err = ErrorOutput::new(format!("json parse: {}", e)).at_line(line_no);
        serde_json::to_writer(&mut out, &err)?;
        writeln!(out)?;
        continue;
      }
    };

    match normalize::normalize(&raw) {
      Ok(event) => events.push(event),
      Err(e) => {
        let err = match &e {
          EngineError::Validation { field, reason } => {
            ErrorOutput::new(reason.clone()).with_field(field.clone())
          }
          _ => ErrorOutput::new(e.to_string()),
        };
        serde_json::to_writer(&mut out, &err.at_line(line_no))?;
        writeln!(out)?;
      }
    }
  }

  let config = Config::default();
  let summary = summarize(&events, window_minutes, Utc::now(), config.latency);
  serde_json::to_writer(&mut out, &summary)?;
  writeln!(out)?;
  out.flush()?;
  Ok(())
}
