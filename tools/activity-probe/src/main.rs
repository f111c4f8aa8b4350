//! activity-probe: fetch one repository's event feed and summarize it
//!
//! Usage:
//!   activity-probe <owner> <name>                # counts + pair latencies
//!   activity-probe <owner> <name> --minutes 30   # trailing window for the counts
//!   activity-probe <owner> <name> --list         # also print every kept event
//!   activity-probe <owner> <name> --json         # one JSON summary object
//!
//! Exit codes: 0 on success, 1 when the fetch fails, 2 on usage errors.

use std::fmt::Write as _;
use std::process;

use activity_api::{EventFetcher, FetchConfig, FetchedEvents};
use activity_engine::{
  count_by_type, summarize, ActivitySummary, ApiToken, Event, EventOrder, LatencyOptions,
  RepositoryIdentity, ScanMode,
};
use chrono::Utc;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "activity-probe", version, about)]
struct Cli {
  /// Repository owner (user or organization).
  owner: String,
  /// Repository name.
  name: String,
  /// API token, sent as a bearer credential.
  #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
  token: Option<String>,
  #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
  api_url: String,
  /// Trailing window for the per-kind counts, in minutes.
  #[arg(long, default_value_t = 60)]
  minutes: i64,
  /// Latency scan: full | skip-last-pair.
  #[arg(long, default_value = "full", value_parser = parse_scan)]
  scan: ScanMode,
  /// Ordering before the latency scan: as-fetched | newest-first | oldest-first.
  #[arg(long, default_value = "as-fetched", value_parser = parse_order)]
  order: EventOrder,
  /// Print every kept event.
  #[arg(long)]
  list: bool,
  /// Emit a JSON summary instead of text.
  #[arg(long)]
  json: bool,
}

fn parse_scan(s: &str) -> Result<ScanMode, String> {
  ScanMode::from_str_loose(s).ok_or_else(|| format!("unknown scan mode {:?}", s))
}

fn parse_order(s: &str) -> Result<EventOrder, String> {
  EventOrder::from_str_loose(s).ok_or_else(|| format!("unknown order {:?}", s))
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  if cli.minutes < 0 {
    eprintln!("activity-probe: --minutes must not be negative");
    process::exit(2);
  }
  let identity = RepositoryIdentity::new(&cli.owner, &cli.name).unwrap_or_else(|e| {
    eprintln!("activity-probe: {}", e);
    process::exit(2);
  });
  let token = cli.token.as_deref().and_then(ApiToken::parse);

  let fetcher = EventFetcher::new(FetchConfig {
    api_base: cli.api_url.clone(),
    ..FetchConfig::default()
  })
  .unwrap_or_else(|e| {
    eprintln!("activity-probe: {}", e);
    process::exit(2);
  });

  let fetched = match fetcher.fetch(&identity, token.as_ref()).await {
    Ok(f) => f,
    Err(e) => {
      eprintln!("activity-probe: {}: {}", identity, e);
      process::exit(1);
    }
  };

  let options = LatencyOptions {
    scan: cli.scan,
    order: cli.order,
  };
  let summary = summarize(&fetched.events, cli.minutes, Utc::now(), options);

  if cli.json {
    match serde_json::to_string_pretty(&summary) {
      Ok(json) => println!("{}", json),
      Err(e) => {
        eprintln!("activity-probe: {}", e);
        process::exit(1);
      }
    }
    return;
  }

  if cli.list {
    print!("{}", render_events(&fetched.events));
  }
  print!(
    "{}",
    render_report(&identity, &fetched, &summary, fetcher.config().recency_window_minutes)
  );
}

fn render_events(events: &[Event]) -> String {
  let mut out = String::new();
  for event in events {
    let _ = writeln!(out, "Repo: {}", event.repo_name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Event: {}", event.event_type);
    let _ = writeln!(out, "Created at: {}", event.created_at.to_rfc3339());
    let _ = writeln!(out, "{}", "-".repeat(40));
  }
  out
}

fn render_report(
  identity: &RepositoryIdentity,
  fetched: &FetchedEvents,
  summary: &ActivitySummary,
  recency_window_minutes: i64,
) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{}: scanned {} events over {} page(s)",
    identity, fetched.scanned, fetched.pages
  );
  let _ = writeln!(
    out,
    "tracked in last {} minutes: {}{}",
    recency_window_minutes,
    fetched.events.len(),
    if fetched.capped { " (capped)" } else { "" }
  );
  let _ = writeln!(
    out,
    "last {} minutes: {}",
    summary.window_minutes,
    summary.window_counts.total()
  );

  let kinds: Vec<String> = summary
    .window_counts
    .iter()
    .map(|(kind, n)| format!("{}={}", kind, n))
    .collect();
  let _ = writeln!(out, "  by type: {}", kinds.join(" "));

  let all: Vec<String> = count_by_type(&fetched.events)
    .iter()
    .map(|(kind, n)| format!("{}={}", kind, n))
    .collect();
  let _ = writeln!(out, "event types: {}", all.join(" "));

  match &summary.latency {
    None => {
      let _ = writeln!(out, "pair latency: insufficient data");
    }
    Some(table) => {
      let _ = writeln!(out, "pair latency (mean seconds):");
      for cell in table.iter() {
        let mean = cell
          .mean_seconds
          .map(|m| format!("{:.1}", m))
          .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
          out,
          "  {:>16} -> {:<16} {:>12}  (n={})",
          cell.from.as_str(),
          cell.to.as_str(),
          mean,
          cell.samples
        );
      }
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  fn fetched() -> FetchedEvents {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    let mut watch = Event::new("WatchEvent", t0);
    watch.repo_name = Some("octo/demo".into());
    FetchedEvents {
      events: vec![watch, Event::new("IssuesEvent", t0 - Duration::seconds(30))],
      scanned: 7,
      pages: 1,
      capped: false,
    }
  }

  #[test]
  fn cli_parses_modes() {
    let cli = Cli::try_parse_from([
      "activity-probe",
      "octo",
      "demo",
      "--scan",
      "skip-last-pair",
      "--order",
      "newest-first",
      "--minutes",
      "15",
    ])
    .unwrap();
    assert_eq!(cli.scan, ScanMode::SkipLastPair);
    assert_eq!(cli.order, EventOrder::NewestFirst);
    assert_eq!(cli.minutes, 15);
  }

  #[test]
  fn cli_rejects_unknown_scan() {
    assert!(Cli::try_parse_from(["activity-probe", "octo", "demo", "--scan", "half"]).is_err());
  }

  #[test]
  fn report_lists_counts_and_latency() {
    let id = RepositoryIdentity::new("octo", "demo").unwrap();
    let fetched = fetched();
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 10, 0).unwrap();
    let summary = summarize(&fetched.events, 60, now, LatencyOptions::default());
    let report = render_report(&id, &fetched, &summary, 1080);

    assert!(report.contains("octo/demo: scanned 7 events over 1 page(s)"));
    assert!(report.contains("tracked in last 1080 minutes: 2\n"));
    assert!(report.contains("last 60 minutes: 2"));
    assert!(report.contains("event types: WatchEvent=1 PullRequestEvent=0 IssuesEvent=1"));
    assert!(report.contains("30.0"));
  }

  #[test]
  fn report_flags_insufficient_data() {
    let id = RepositoryIdentity::new("octo", "demo").unwrap();
    let mut fetched = fetched();
    fetched.events.truncate(1);
    let summary = summarize(&fetched.events, 60, Utc::now(), LatencyOptions::default());
    let report = render_report(&id, &fetched, &summary, 1080);
    assert!(report.contains("pair latency: insufficient data"));
  }

  #[test]
  fn event_listing_uses_repo_name() {
    let listing = render_events(&fetched().events);
    assert!(listing.contains("Repo: octo/demo"));
    assert!(listing.contains("Event: IssuesEvent"));
    assert_eq!(listing.matches(&"-".repeat(40)).count(), 2);
  }
}
