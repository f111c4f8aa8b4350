//! Paginated event-feed client.
//!
//! Walks `GET /repos/{owner}/{name}/events` following `Link: rel="next"` headers,
//! keeping only tracked, recent events and stopping at the event cap. A failed page
//! fails the whole fetch; there is no retry.

use activity_engine::{filter, normalize, ApiToken, Event, InboundEvent, RepositoryIdentity};
use chrono::Utc;
use reqwest::header::{ACCEPT, LINK};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::FetchError;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Fetch limits and endpoint.
#[derive(Debug, Clone)]
pub struct FetchConfig {
  /// Base URL of the events API (no trailing path), e.g. `https://api.github.com`.
  pub api_base: String,
  pub per_page: u32,
  /// Max events returned per repository, counted after filtering.
  pub event_cap: usize,
  /// Events older than this many minutes are dropped while fetching.
  pub recency_window_minutes: i64,
  pub user_agent: String,
  pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
  fn default() -> Self {
    let engine = activity_engine::Config::default();
    Self {
      api_base: "https://api.github.com".into(),
      per_page: 100,
      event_cap: engine.event_cap,
      recency_window_minutes: engine.recency_window_minutes,
      user_agent: concat!("activity-api/", env!("CARGO_PKG_VERSION")).into(),
      timeout: None,
    }
  }
}

/// Events kept from one repository fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchedEvents {
  /// Tracked, recent events in source order (newest first).
  pub events: Vec<Event>,
  /// Raw records read across all pages.
  pub scanned: usize,
  pub pages: usize,
  /// Whether the event cap ended the fetch.
  pub capped: bool,
}

#[derive(Debug, Clone)]
pub struct EventFetcher {
  client: reqwest::Client,
  config: FetchConfig,
}

impl EventFetcher {
  pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &FetchConfig {
    &self.config
  }

  /// URL of the first feed page for a repository.
  pub fn first_page_url(&self, identity: &RepositoryIdentity) -> Result<Url, FetchError> {
    let mut url = Url::parse(&self.config.api_base)
      .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.config.api_base, e)))?;
    url
      .path_segments_mut()
      .map_err(|_| FetchError::InvalidUrl(format!("{}: cannot be a base", self.config.api_base)))?
      .pop_if_empty()
      .extend(["repos", identity.owner(), identity.name(), "events"]);
    url
      .query_pairs_mut()
      .append_pair("per_page", &self.config.per_page.to_string());
    Ok(url)
  }

  /// Fetch tracked events newer than the recency window, up to the event cap.
  ///
  /// The token, when present, is sent as a bearer credential on every page.
  pub async fn fetch(
    &self,
    identity: &RepositoryIdentity,
    token: Option<&ApiToken>,
  ) -> Result<FetchedEvents, FetchError> {
    let threshold = filter::window_threshold(Utc::now(), self.config.recency_window_minutes);
    let mut fetched = FetchedEvents::default();
    let mut next = Some(self.first_page_url(identity)?);

    while let Some(url) = next.take() {
      if fetched.events.len() >= self.config.event_cap {
        fetched.capped = true;
        break;
      }

      let mut request = self.client.get(url.clone()).header(ACCEPT, GITHUB_ACCEPT);
      if let Some(token) = token {
        request = request.bearer_auth(token.expose());
      }
      let response = request.send().await?;
      fetched.pages += 1;

      let status = response.status();
      if !status.is_success() {
        let message = response
          .json::<serde_json::Value>()
          .await
          .ok()
          .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));
        error!(
          repository = %identity,
          status = status.as_u16(),
          url = %url,
          message = message.as_deref().unwrap_or(""),
          "failed to fetch events page"
        );
        return Err(FetchError::Status {
          status: status.as_u16(),
          url: url.to_string(),
          message,
        });
      }

      let next_link = response
        .headers()
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_next_link);

      let body = response.bytes().await?;
      let page: Vec<InboundEvent> =
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
          url: url.to_string(),
          source,
        })?;
      debug!(repository = %identity, page = fetched.pages, records = page.len(), "fetched events page");

      for raw in &page {
        fetched.scanned += 1;
        let event = normalize::normalize(raw).map_err(|source| FetchError::Event {
          url: url.to_string(),
          source,
        })?;
        if !filter::is_tracked_and_recent(&event, threshold) {
          continue;
        }
        fetched.events.push(event);
        if fetched.events.len() >= self.config.event_cap {
          fetched.capped = true;
          break;
        }
      }

      if fetched.capped {
        break;
      }

      next = match next_link {
        Some(link) => Some(
          Url::parse(&link).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", link, e)))?,
        ),
        None => None,
      };
    }

    debug!(
      repository = %identity,
      kept = fetched.events.len(),
      scanned = fetched.scanned,
      pages = fetched.pages,
      capped = fetched.capped,
      "fetch complete"
    );
    Ok(fetched)
  }
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header value.
pub fn parse_next_link(header: &str) -> Option<String> {
  header.split(',').find_map(|entry| {
    let mut parts = entry.split(';');
    let target = parts.next()?.trim();
    let target = target.strip_prefix('<')?.strip_suffix('>')?;
    let is_next = parts.any(|param| {
      let Some((key, value)) = param.split_once('=') else {
        return false;
      };
      key.trim().eq_ignore_ascii_case("rel")
        && value
          .trim()
          .trim_matches('"')
          .split_whitespace()
          .any(|rel| rel.eq_ignore_ascii_case("next"))
    });
    is_next.then(|| target.to_string())
  })
}
