//! Chromium-family profiles (Chrome, Edge, Brave, Chromium).
//!
//! Profiles are the `Default` and `Profile N` directories under the user data
//! directory, each holding a `History` SQLite database. Timestamps in that
//! database count microseconds since 1601-01-01 UTC.

use crate::profile::ProfilePath;
use crate::source::{Family, HistorySource};
use crate::sqlite::{extract_with, query_entries};
use crate::transition::chromium_label;
use crate::{Error, Result};
use browser_history_core::TimeWindow;
use browser_history_core::history::HistoryEntry;
use chrono::{DateTime, Utc};
use rusqlite::params;
use std::path::Path;

/// Microseconds between 1601-01-01 and 1970-01-01
pub const CHROMIUM_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600_000_000;

const HISTORY_FILE: &str = "History";
const PREFERENCES_FILE: &str = "Preferences";

/// One row per URL last visited inside the window, with the transition of
/// its most recent visit.
const HISTORY_QUERY: &str = "
    SELECT u.url, u.title, u.visit_count, u.typed_count, u.last_visit_time, v.transition
    FROM urls u
    JOIN visits v ON v.id = (SELECT MAX(visits.id) FROM visits WHERE visits.url = u.id)
    WHERE u.last_visit_time >= ?1 AND u.last_visit_time <= ?2
    ORDER BY u.last_visit_time DESC";

/// Convert a point in time to a Chromium timestamp
pub fn to_chromium_time(time: &DateTime<Utc>) -> i64 {
    time.timestamp_micros() + CHROMIUM_EPOCH_OFFSET_MICROS
}

/// Convert a Chromium timestamp back to a point in time
pub fn from_chromium_time(value: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(value.checked_sub(CHROMIUM_EPOCH_OFFSET_MICROS)?)
}

/// Shared strategy for every Chromium-based browser
#[derive(Debug, Default, Clone, Copy)]
pub struct Chromium;

impl Chromium {
    fn is_profile_dir(name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.starts_with("profile") || lower.contains("default")
    }

    /// Display name from `Preferences` (`profile.name`); any failure yields none
    fn display_name(profile_dir: &Path) -> Option<String> {
        let contents = std::fs::read_to_string(profile_dir.join(PREFERENCES_FILE)).ok()?;
        let prefs: serde_json::Value = serde_json::from_str(&contents).ok()?;
        prefs
            .pointer("/profile/name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }
}

impl HistorySource for Chromium {
    fn family(&self) -> Family {
        Family::Chromium
    }

    fn discover(&self, browser: &str, base_dir: &Path) -> Result<Vec<ProfilePath>> {
        let no_profiles = || Error::NoProfiles {
            browser: browser.to_string(),
            dir: base_dir.to_path_buf(),
        };

        if !base_dir.is_dir() {
            return Err(no_profiles());
        }

        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if Self::is_profile_dir(&name) {
                dirs.push((name, entry.path()));
            }
        }
        dirs.sort_by(|a, b| a.0.cmp(&b.0));

        let profiles: Vec<ProfilePath> = dirs
            .into_iter()
            .filter_map(|(directory, path)| {
                let history_file = path.join(HISTORY_FILE);
                if !history_file.is_file() {
                    tracing::debug!("Skipping {}: no History database", path.display());
                    return None;
                }
                Some(ProfilePath {
                    name: Self::display_name(&path),
                    directory,
                    history_file,
                })
            })
            .collect();

        if profiles.is_empty() {
            return Err(no_profiles());
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
        let start = to_chromium_time(&window.start);
        let end = to_chromium_time(&window.end);

        extract_with(Family::Chromium, snapshot, window, diagnostics, |conn| {
            query_entries(conn, snapshot, HISTORY_QUERY, params![start, end], |row| {
                let last_visit: i64 = row.get(4)?;
                let timestamp = from_chromium_time(last_visit)
                    .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, last_visit))?;

                Ok(HistoryEntry {
                    url: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    visit_count: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    typed_count: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    visit_type: chromium_label(row.get::<_, Option<i64>>(5)?.unwrap_or(0)),
                    timestamp,
                    profile: profile.to_string(),
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rusqlite::Connection;
    use std::path::PathBuf;

    const SCHEMA: &str = "
        CREATE TABLE urls (
            id INTEGER PRIMARY KEY,
            url LONGVARCHAR,
            title LONGVARCHAR,
            visit_count INTEGER DEFAULT 0 NOT NULL,
            typed_count INTEGER DEFAULT 0 NOT NULL,
            last_visit_time INTEGER NOT NULL,
            hidden INTEGER DEFAULT 0 NOT NULL
        );
        CREATE TABLE visits (
            id INTEGER PRIMARY KEY,
            url INTEGER NOT NULL,
            visit_time INTEGER NOT NULL,
            from_visit INTEGER,
            transition INTEGER DEFAULT 0 NOT NULL
        );";

    struct Visit<'a> {
        url: &'a str,
        title: Option<&'a str>,
        time: DateTime<Utc>,
        transition: i64,
    }

    fn seed(path: &Path, visits: &[Visit<'_>]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        for (idx, visit) in visits.iter().enumerate() {
            let id = idx as i64 + 1;
            let chrome_time = to_chromium_time(&visit.time);
            conn.execute(
                "INSERT INTO urls (id, url, title, visit_count, typed_count, last_visit_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, visit.url, visit.title, 2, 1, chrome_time],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO visits (url, visit_time, transition) VALUES (?1, ?2, ?3)",
                params![id, chrome_time, visit.transition],
            )
            .unwrap();
        }
    }

    fn window_around(now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::new(now - Duration::hours(2), now + Duration::hours(1)).unwrap()
    }

    fn make_profile(base: &Path, dir: &str, with_history: bool) -> PathBuf {
        let profile = base.join(dir);
        std::fs::create_dir_all(&profile).unwrap();
        if with_history {
            std::fs::write(profile.join(HISTORY_FILE), b"").unwrap();
        }
        profile
    }

    #[test]
    fn test_time_round_trip_truncates_to_micros() {
        let now = Utc::now();
        let converted = from_chromium_time(to_chromium_time(&now)).unwrap();

        assert_eq!(converted.timestamp_micros(), now.timestamp_micros());
        assert!(now - converted < Duration::microseconds(1));
    }

    #[test]
    fn test_time_round_trip_known_values() {
        for value in [
            0_i64,
            CHROMIUM_EPOCH_OFFSET_MICROS,
            13_350_000_000_123_456,
            CHROMIUM_EPOCH_OFFSET_MICROS + 1,
        ] {
            let time = from_chromium_time(value).unwrap();
            assert_eq!(to_chromium_time(&time), value);
        }
    }

    #[test]
    fn test_unix_epoch_conversion() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_chromium_time(&epoch), CHROMIUM_EPOCH_OFFSET_MICROS);
    }

    #[test]
    fn test_discover_profiles() {
        let base = tempfile::tempdir().unwrap();
        make_profile(base.path(), "Default", true);
        make_profile(base.path(), "Profile 1", true);
        make_profile(base.path(), "Profile 2", false);
        make_profile(base.path(), "System Profile", true);
        make_profile(base.path(), "Crashpad", true);
        std::fs::write(base.path().join("Local State"), b"{}").unwrap();

        let profiles = Chromium.discover("chrome", base.path()).unwrap();

        let dirs: Vec<&str> = profiles.iter().map(|p| p.directory.as_str()).collect();
        assert_eq!(dirs, vec!["Default", "Profile 1"]);
        assert_eq!(
            profiles[0].history_file,
            base.path().join("Default").join("History")
        );
    }

    #[test]
    fn test_discover_reads_display_name() {
        let base = tempfile::tempdir().unwrap();
        let default = make_profile(base.path(), "Default", true);
        std::fs::write(
            default.join(PREFERENCES_FILE),
            r#"{"profile": {"name": "Personal"}}"#,
        )
        .unwrap();
        let work = make_profile(base.path(), "Profile 3", true);
        std::fs::write(work.join(PREFERENCES_FILE), "not json").unwrap();

        let profiles = Chromium.discover("chrome", base.path()).unwrap();

        assert_eq!(profiles[0].name.as_deref(), Some("Personal"));
        assert_eq!(profiles[0].label(), "Personal");
        assert_eq!(profiles[1].name, None);
        assert_eq!(profiles[1].label(), "Profile 3");
    }

    #[test]
    fn test_discover_without_profiles_fails() {
        let base = tempfile::tempdir().unwrap();
        make_profile(base.path(), "Crashpad", true);

        let err = Chromium.discover("edge", base.path()).unwrap_err();
        assert!(matches!(err, Error::NoProfiles { ref browser, .. } if browser == "edge"));
    }

    #[test]
    fn test_discover_missing_base_dir_fails() {
        let base = tempfile::tempdir().unwrap();
        let result = Chromium.discover("brave", &base.path().join("missing"));
        assert!(matches!(result, Err(Error::NoProfiles { .. })));
    }

    #[test]
    fn test_extract_filters_window_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("History");
        let now = Utc::now();
        seed(
            &db,
            &[
                Visit {
                    url: "https://test.com",
                    title: Some("Test"),
                    time: now - Duration::hours(1),
                    transition: 1,
                },
                Visit {
                    url: "https://example.com",
                    title: Some("Example"),
                    time: now,
                    transition: 8,
                },
                Visit {
                    url: "https://old.example.com",
                    title: Some("Old"),
                    time: now - Duration::days(3),
                    transition: 0,
                },
                Visit {
                    url: "https://future.example.com",
                    title: Some("Future"),
                    time: now + Duration::days(1),
                    transition: 0,
                },
            ],
        );

        let window = window_around(now);
        let entries = Chromium.extract(&db, "Default", &window, false).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://example.com");
        assert_eq!(entries[0].visit_type, "RELOAD");
        assert_eq!(entries[1].url, "https://test.com");
        assert_eq!(entries[1].visit_type, "TYPED");
        assert_eq!(entries[1].visit_count, 2);
        assert_eq!(entries[1].typed_count, 1);
        for entry in &entries {
            assert!(window.contains(&entry.timestamp));
            assert_eq!(entry.profile, "Default");
        }
    }

    #[test]
    fn test_extract_null_title_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("History");
        let now = Utc::now();
        seed(
            &db,
            &[Visit {
                url: "https://untitled.example.com",
                title: None,
                time: now,
                transition: 0x8000_0000,
            }],
        );

        let entries = Chromium.extract(&db, "Default", &window_around(now), true).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].visit_type, "LINK (SERVER_REDIRECT)");
    }

    #[test]
    fn test_extract_uses_most_recent_visit_transition() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("History");
        let now = Utc::now();
        seed(
            &db,
            &[Visit {
                url: "https://example.com",
                title: Some("Example"),
                time: now,
                transition: 1,
            }],
        );
        let conn = Connection::open(&db).unwrap();
        conn.execute(
            "INSERT INTO visits (url, visit_time, transition) VALUES (1, ?1, 8)",
            params![to_chromium_time(&now)],
        )
        .unwrap();
        drop(conn);

        let entries = Chromium.extract(&db, "Default", &window_around(now), false).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].visit_type, "RELOAD");
    }

    #[test]
    fn test_extract_no_rows_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("History");
        seed(&db, &[]);

        let entries = Chromium
            .extract(&db, "Default", &window_around(Utc::now()), true)
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_extract_missing_database_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("missing");

        let err = Chromium
            .extract(&db, "Default", &window_around(Utc::now()), false)
            .unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_extract_wrong_schema_fails_to_query() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("History");
        Connection::open(&db)
            .unwrap()
            .execute_batch("CREATE TABLE other (id INTEGER);")
            .unwrap();

        let err = Chromium
            .extract(&db, "Default", &window_around(Utc::now()), false)
            .unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
    }

    #[test]
    fn test_extract_bad_row_discards_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("History");
        let now = Utc::now();
        seed(
            &db,
            &[Visit {
                url: "https://ok.example.com",
                title: Some("Ok"),
                time: now,
                transition: 0,
            }],
        );
        let conn = Connection::open(&db).unwrap();
        // A blob where a URL string is expected cannot be decoded
        conn.execute(
            "INSERT INTO urls (id, url, title, last_visit_time) VALUES (2, x'00ff', 'Bad', ?1)",
            params![to_chromium_time(&(now - Duration::minutes(1)))],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO visits (url, visit_time, transition) VALUES (2, 0, 0)",
            [],
        )
        .unwrap();
        drop(conn);

        let err = Chromium
            .extract(&db, "Default", &window_around(now), false)
            .unwrap_err();
        assert!(matches!(err, Error::Scan { .. }));
    }
}
