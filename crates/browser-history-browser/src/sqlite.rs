use crate::source::Family;
use crate::{Error, Result};
use browser_history_core::TimeWindow;
use browser_history_core::history::HistoryEntry;
use rusqlite::{Connection, OpenFlags, Params, Row};
use std::path::Path;

/// Open a history database without ever taking a write lock on it
pub(crate) fn open_read_only(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Run `sql` and map every row; any row failure discards the whole result
pub(crate) fn query_entries<P, F>(
    conn: &Connection,
    path: &Path,
    sql: &str,
    params: P,
    map_row: F,
) -> Result<Vec<HistoryEntry>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<HistoryEntry>,
{
    let query_error = |source| Error::Query {
        path: path.to_path_buf(),
        source,
    };

    let mut stmt = conn.prepare(sql).map_err(query_error)?;
    let rows = stmt.query_map(params, map_row).map_err(query_error)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|source| Error::Scan {
            path: path.to_path_buf(),
            source,
        })
}

/// Open `path` and run `query` against it, reporting progress when diagnostics are on
pub(crate) fn extract_with<F>(
    family: Family,
    path: &Path,
    window: &TimeWindow,
    diagnostics: bool,
    query: F,
) -> Result<Vec<HistoryEntry>>
where
    F: FnOnce(&Connection) -> Result<Vec<HistoryEntry>>,
{
    let result = open_read_only(path).and_then(|conn| {
        if diagnostics {
            tracing::info!(
                "Querying {} history from {} between {} and {}",
                family.as_str(),
                path.display(),
                window.start.to_rfc3339(),
                window.end.to_rfc3339()
            );
        }
        query(&conn)
    });

    if diagnostics {
        match &result {
            Ok(entries) if entries.is_empty() => tracing::warn!(
                "No entries found in {}. The database may be empty or not yet flushed, \
                 or the time range may be wrong.",
                path.display()
            ),
            Ok(entries) => tracing::info!(
                "Retrieved {} entries from {}",
                entries.len(),
                path.display()
            ),
            Err(err) => tracing::warn!("{}", err),
        }
    }

    result
}
