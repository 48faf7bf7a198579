use crate::registry::Registry;
use crate::snapshot::Snapshot;
use crate::source::Browser;
use crate::Result;
use browser_history_core::TimeWindow;
use browser_history_core::history::{OutputEntry, to_output_entries};
use std::path::PathBuf;

/// Reads history from every selected browser and profile and merges the results.
///
/// Failures are contained: a browser whose profiles cannot be located, or a
/// profile whose database cannot be copied or read, is skipped and only
/// reported when diagnostics are enabled. The one request-level failure is a
/// selection that names no registered browser.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    registry: Registry,
    temp_dir: Option<PathBuf>,
}

impl Aggregator {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            temp_dir: None,
        }
    }

    /// Place snapshots in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Fetch history for `selected` browsers (all when empty) inside `window`.
    ///
    /// Entries are grouped by browser in processing order, then by profile;
    /// each profile's entries stay newest first.
    pub fn fetch(
        &self,
        selected: &[String],
        window: &TimeWindow,
        diagnostics: bool,
    ) -> Result<Vec<OutputEntry>> {
        let browsers = self.registry.select(selected)?;

        let mut entries = Vec::new();
        for browser in &browsers {
            entries.extend(self.fetch_browser(browser, window, diagnostics, browsers.len() > 1));
        }

        if diagnostics {
            tracing::info!(
                "Collected {} entries from {} browser(s)",
                entries.len(),
                browsers.len()
            );
        }

        Ok(entries)
    }

    fn fetch_browser(
        &self,
        browser: &Browser,
        window: &TimeWindow,
        diagnostics: bool,
        announce_paths: bool,
    ) -> Vec<OutputEntry> {
        let profiles = match browser.history_paths() {
            Ok(profiles) => profiles,
            Err(err) => {
                if diagnostics {
                    tracing::warn!("Error finding {} history file: {}", browser.name(), err);
                }
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for profile in &profiles {
            if diagnostics && announce_paths {
                tracing::info!(
                    "Using {} database path: {}",
                    browser.name(),
                    profile.history_file.display()
                );
            }

            let prepared = match &self.temp_dir {
                Some(dir) => Snapshot::prepare_in(dir, &profile.history_file, diagnostics),
                None => Snapshot::prepare(&profile.history_file, diagnostics),
            };
            let mut snapshot = match prepared {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    if diagnostics {
                        tracing::warn!(
                            "Skipping {} profile {}: {}",
                            browser.name(),
                            profile.label(),
                            err
                        );
                    }
                    continue;
                }
            };

            let extracted = browser.extract(snapshot.path(), profile.label(), window, diagnostics);
            snapshot.release();

            match extracted {
                Ok(found) => entries.extend(to_output_entries(found, browser.name())),
                Err(err) => {
                    if diagnostics {
                        tracing::warn!(
                            "Error retrieving {} history for profile {}: {}",
                            browser.name(),
                            profile.label(),
                            err
                        );
                    }
                }
            }
        }

        entries
    }
}
