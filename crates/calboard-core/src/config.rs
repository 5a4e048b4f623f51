use std::time::Duration;

use anyhow::Context;
use chrono::Weekday;
use serde::Deserialize;
use tracing::{
  error,
  info,
  warn
};

const DEFAULT_EVENTS_ENDPOINT: &str =
  "/events";
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_WEEK_START: &str = "sunday";

#[derive(
  Debug, Clone, PartialEq, Eq, Deserialize,
)]
#[serde(default)]
pub struct ClientConfig {
  pub version:            u32,
  pub events_endpoint:    String,
  pub login_path:         String,
  pub poll_interval_secs: u64,
  pub week_start:         String
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      version:            1,
      events_endpoint:
        DEFAULT_EVENTS_ENDPOINT.to_string(),
      login_path:
        DEFAULT_LOGIN_PATH.to_string(),
      poll_interval_secs:
        DEFAULT_POLL_INTERVAL_SECS,
      week_start:
        DEFAULT_WEEK_START.to_string()
    }
  }
}

impl ClientConfig {
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config: Self =
      toml::from_str(raw).context(
        "failed parsing client config"
      )?;
    config.sanitize();
    Ok(config)
  }

  /// Parses the embedded config, falling
  /// back to defaults on any error.
  pub fn load_or_default(raw: &str) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(config) => {
        info!(
          version = config.version,
          endpoint = %config.events_endpoint,
          poll_interval_secs =
            config.poll_interval_secs,
          week_start = %config.week_start,
          "loaded client config"
        );
        config
      }
      | Err(err) => {
        let detail = format!("{err:#}");
        error!(
          error = %detail,
          "failed parsing client config; \
           using defaults"
        );
        Self::default()
      }
    }
  }

  fn sanitize(&mut self) {
    if self
      .events_endpoint
      .trim()
      .is_empty()
    {
      self.events_endpoint =
        DEFAULT_EVENTS_ENDPOINT.to_string();
    }

    if self.login_path.trim().is_empty() {
      self.login_path =
        DEFAULT_LOGIN_PATH.to_string();
    }

    if self.poll_interval_secs == 0 {
      self.poll_interval_secs =
        DEFAULT_POLL_INTERVAL_SECS;
    }

    if parse_week_start(&self.week_start)
      .is_none()
    {
      warn!(
        week_start = %self.week_start,
        "unknown week start; using sunday"
      );
      self.week_start =
        DEFAULT_WEEK_START.to_string();
    }
  }

  pub fn week_start_day(&self) -> Weekday {
    parse_week_start(&self.week_start)
      .unwrap_or(Weekday::Sun)
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_secs(
      self.poll_interval_secs
    )
  }
}

/// Accepts full or three-letter weekday
/// names in any case.
pub fn parse_week_start(
  raw: &str
) -> Option<Weekday> {
  raw.trim().parse::<Weekday>().ok()
}
