//! Gecko-family profiles (Firefox).
//!
//! Profiles are listed in `profiles.ini` under the Firefox data directory and
//! each holds a `places.sqlite` database whose timestamps are Unix epoch
//! microseconds.

use crate::profile::ProfilePath;
use crate::source::{Family, HistorySource};
use crate::sqlite::{extract_with, query_entries};
use crate::transition::gecko_label;
use crate::{Error, Result};
use browser_history_core::TimeWindow;
use browser_history_core::history::HistoryEntry;
use chrono::DateTime;
use ini::Ini;
use rusqlite::params;
use std::path::{Path, PathBuf};

const PROFILES_INI: &str = "profiles.ini";
const PLACES_FILE: &str = "places.sqlite";

const HISTORY_QUERY: &str = "
    SELECT p.url, p.title, p.visit_count, p.typed, v.visit_date, v.visit_type
    FROM moz_places p
    JOIN moz_historyvisits v ON v.place_id = p.id
    WHERE v.visit_date >= ?1 AND v.visit_date <= ?2
    ORDER BY v.visit_date DESC";

#[derive(Debug, Default, Clone, Copy)]
pub struct Gecko;

impl HistorySource for Gecko {
    fn family(&self) -> Family {
        Family::Gecko
    }

    fn discover(&self, _browser: &str, base_dir: &Path) -> Result<Vec<ProfilePath>> {
        let ini_path = base_dir.join(PROFILES_INI);
        // Absolute Windows paths contain backslashes, so escapes stay literal
        let ini = Ini::load_from_file_noescape(&ini_path).map_err(|source| Error::ProfileConfig {
            path: ini_path.clone(),
            source,
        })?;

        let mut profiles = Vec::new();
        for (section, props) in ini.iter() {
            let Some(section) = section else { continue };
            if !section.starts_with("Profile") {
                continue;
            }

            let path = props.get("Path").map(str::trim).unwrap_or_default();
            if path.is_empty() {
                continue;
            }

            let is_relative = props
                .get("IsRelative")
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0)
                == 1;
            let profile_dir = if is_relative {
                base_dir.join(path)
            } else {
                PathBuf::from(path)
            };

            let history_file = profile_dir.join(PLACES_FILE);
            if !history_file.exists() {
                tracing::debug!(
                    "Skipping [{}]: {} does not exist",
                    section,
                    history_file.display()
                );
                continue;
            }

            let directory = profile_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string());

            profiles.push(ProfilePath {
                directory,
                name: props.get("Name").map(str::to_string),
                history_file,
            });
        }

        Ok(profiles)
    }

    fn extract(
        &self,
        snapshot: &Path,
        profile: &str,
        window: &TimeWindow,
        diagnostics: bool,
    ) -> Result<Vec<HistoryEntry>> {
        let start = window.start.timestamp_micros();
        let end = window.end.timestamp_micros();

        extract_with(Family::Gecko, snapshot, window, diagnostics, |conn| {
            query_entries(conn, snapshot, HISTORY_QUERY, params![start, end], |row| {
                let visit_date: i64 = row.get(4)?;
                let timestamp = DateTime::from_timestamp_micros(visit_date)
                    .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, visit_date))?;

                Ok(HistoryEntry {
                    url: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    visit_count: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    typed_count: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    visit_type: gecko_label(row.get::<_, Option<i64>>(5)?.unwrap_or(0)),
                    timestamp,
                    profile: profile.to_string(),
                })
            })
        })
    }
}
