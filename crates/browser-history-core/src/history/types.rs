use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single visited page as read from one browser profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    /// Page title; absent titles are stored as an empty string
    pub title: String,
    pub visit_count: i64,
    pub typed_count: i64,
    /// Decoded transition label (e.g. `TYPED`, `LINK (SERVER_REDIRECT)`)
    pub visit_type: String,
    pub timestamp: DateTime<Utc>,
    /// Profile the entry was read from
    pub profile: String,
}

/// Externally visible history record handed to the CLI and HTTP layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEntry {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "visitCount", default)]
    pub visit_count: i64,
    #[serde(default)]
    pub typed: i64,
    #[serde(rename = "visitType", default)]
    pub visit_type: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub profile: String,
}

impl OutputEntry {
    /// Project a history entry into its output shape, tagging it with the browser name
    pub fn from_entry(entry: HistoryEntry, browser: &str) -> Self {
        Self {
            timestamp: format_timestamp(&entry.timestamp),
            title: entry.title,
            url: entry.url,
            visit_count: entry.visit_count,
            typed: entry.typed_count,
            visit_type: entry.visit_type,
            browser: browser.to_string(),
            profile: entry.profile,
        }
    }

    /// Title for display, substituting a placeholder when the page had none
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(no title)"
        } else {
            &self.title
        }
    }
}

/// Convert every entry of one browser into output entries, preserving order
pub fn to_output_entries(entries: Vec<HistoryEntry>, browser: &str) -> Vec<OutputEntry> {
    entries
        .into_iter()
        .map(|entry| OutputEntry::from_entry(entry, browser))
        .collect()
}

/// RFC 3339 in UTC with second precision
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
