//! Per-invocation configuration.
//!
//! A [`Config`] is a plain value: the CLI builds one from flags, the HTTP
//! server clones its base config for every request and overlays the query
//! parameters on the copy. Nothing in the extraction pipeline mutates it.

use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// Inclusive `[start, end]` range of visit times to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidWindow(format!(
                "start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Window covering the `days` days leading up to `end`
    pub fn last_days(end: DateTime<Utc>, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::InvalidWindow(
                "history days must be greater than zero".to_string(),
            ));
        }
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| Error::InvalidWindow("history days out of range".to_string()))?;
        Self::new(start, end)
    }

    /// Parse a window from two RFC 3339 timestamps
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| Error::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub history_days: u32,
    /// Requested browser names; empty means every registered browser
    pub browsers: Vec<String>,
    pub debug: bool,
    pub output: OutputFormat,
    pub pretty: bool,
    pub port: u16,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_days: DEFAULT_HISTORY_DAYS,
            browsers: Vec::new(),
            debug: false,
            output: OutputFormat::default(),
            pretty: false,
            port: DEFAULT_PORT,
            start: None,
            end: None,
        }
    }
}

impl Config {
    /// Set the browser selection from a comma-separated list
    pub fn with_browsers(mut self, list: &str) -> Self {
        self.browsers = parse_browser_list(list);
        self
    }

    /// Resolve the query window: an explicit range wins, otherwise the last
    /// `history_days` days ending at `now`.
    pub fn window(&self, now: DateTime<Utc>) -> Result<TimeWindow> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => TimeWindow::new(start, end),
            (None, None) => TimeWindow::last_days(now, self.history_days),
            _ => Err(Error::InvalidWindow(
                "start and end must be provided together".to_string(),
            )),
        }
    }
}

/// Split `chrome, firefox` style lists, dropping empty items
pub fn parse_browser_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
