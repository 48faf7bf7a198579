use crate::{Error, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// SQLite write-ahead-log and shared-memory companions of a database file
const COMPANION_SUFFIXES: [&str; 2] = ["-wal", "-shm"];

/// A private, readable copy of a history database.
///
/// The source is always copied, whether or not the browser currently holds a
/// lock on it, so no lock probe can race with the read. The copy and its
/// companions are removed by [`Snapshot::release`] or when dropped.
#[derive(Debug)]
pub struct Snapshot {
    path: PathBuf,
    diagnostics: bool,
    released: bool,
}

impl Snapshot {
    /// Copy `source` (and any `-wal`/`-shm` companions) into the system temp directory
    pub fn prepare(source: &Path, diagnostics: bool) -> Result<Self> {
        Self::prepare_in(&std::env::temp_dir(), source, diagnostics)
    }

    /// Copy `source` (and any `-wal`/`-shm` companions) into `dir`
    pub fn prepare_in(dir: &Path, source: &Path, diagnostics: bool) -> Result<Self> {
        let prepare_error = |err: io::Error| Error::Prepare {
            path: source.to_path_buf(),
            source: err,
        };

        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "history".to_string());

        let temp = tempfile::Builder::new()
            .prefix(&format!("browser-history-{}-", file_name))
            .tempfile_in(dir)
            .map_err(prepare_error)?;
        let path = temp
            .into_temp_path()
            .keep()
            .map_err(|err| prepare_error(err.error))?;

        // From here on the temp file belongs to the snapshot and is removed on drop
        let snapshot = Self {
            path,
            diagnostics,
            released: false,
        };

        copy_file(source, &snapshot.path).map_err(prepare_error)?;

        if diagnostics {
            tracing::info!(
                "Copied {} to temp database {}",
                source.display(),
                snapshot.path.display()
            );
        }

        for suffix in COMPANION_SUFFIXES {
            let companion_source = companion_path(source, suffix);
            if !companion_source.exists() {
                continue;
            }

            let companion_copy = companion_path(&snapshot.path, suffix);
            if let Err(err) = copy_file(&companion_source, &companion_copy) {
                if diagnostics {
                    tracing::warn!(
                        "Failed to copy {} to {}: {}",
                        companion_source.display(),
                        companion_copy.display(),
                        err
                    );
                }
            }
        }

        Ok(snapshot)
    }

    /// Path of the readable copy
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Remove the copy and its companions. Safe to call more than once;
    /// removal failures are only logged.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let files = std::iter::once(self.path.clone()).chain(
            COMPANION_SUFFIXES
                .iter()
                .map(|suffix| companion_path(&self.path, suffix)),
        );

        for file in files {
            match std::fs::remove_file(&file) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    if self.diagnostics {
                        tracing::warn!("Failed to remove temp file {}: {}", file.display(), err);
                    }
                }
            }
        }
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        self.release();
    }
}

/// `History` + `-wal` -> `History-wal`
fn companion_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Stream `src` into a freshly created `dst` and flush it to disk
fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    let mut source = File::open(src)?;
    let mut destination = File::create(dst)?;
    io::copy(&mut source, &mut destination)?;
    destination.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_source(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_snapshot_copies_contents() {
        let source_dir = tempfile::tempdir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let source = write_source(source_dir.path(), "History", b"sqlite bytes");

        let snapshot = Snapshot::prepare_in(temp_dir.path(), &source, false).unwrap();

        assert_ne!(snapshot.path(), source.as_path());
        assert_eq!(std::fs::read(snapshot.path()).unwrap(), b"sqlite bytes");
    }

    #[test]
    fn test_unlocked_source_is_still_copied() {
        // Copy-always policy: even a file nobody holds open is never read in place
        let source_dir = tempfile::tempdir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let source = write_source(source_dir.path(), "places.sqlite", b"data");

        let snapshot = Snapshot::prepare_in(temp_dir.path(), &source, false).unwrap();

        assert!(snapshot.path().starts_with(temp_dir.path()));
        assert!(
            snapshot
                .path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("browser-history-places.sqlite-")
        );
    }

    #[test]
    fn test_snapshot_copies_companions() {
        let source_dir = tempfile::tempdir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let source = write_source(source_dir.path(), "History", b"main");
        write_source(source_dir.path(), "History-wal", b"wal");
        write_source(source_dir.path(), "History-shm", b"shm");

        let snapshot = Snapshot::prepare_in(temp_dir.path(), &source, false).unwrap();

        let wal = companion_path(snapshot.path(), "-wal");
        let shm = companion_path(snapshot.path(), "-shm");
        assert_eq!(std::fs::read(&wal).unwrap(), b"wal");
        assert_eq!(std::fs::read(&shm).unwrap(), b"shm");
    }

    #[test]
    fn test_release_removes_files_and_is_idempotent() {
        let source_dir = tempfile::tempdir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let source = write_source(source_dir.path(), "History", b"main");
        write_source(source_dir.path(), "History-wal", b"wal");

        let mut snapshot = Snapshot::prepare_in(temp_dir.path(), &source, false).unwrap();
        let path = snapshot.path().to_path_buf();
        let wal = companion_path(&path, "-wal");
        assert!(path.exists());
        assert!(wal.exists());

        snapshot.release();
        assert!(snapshot.is_released());
        assert!(!path.exists());
        assert!(!wal.exists());

        // Second release is a no-op
        snapshot.release();
        assert!(!path.exists());

        // Source is untouched
        assert!(source.exists());
    }

    #[test]
    fn test_drop_releases_snapshot() {
        let source_dir = tempfile::tempdir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let source = write_source(source_dir.path(), "History", b"main");

        let snapshot = Snapshot::prepare_in(temp_dir.path(), &source, true).unwrap();
        let path = snapshot.path().to_path_buf();

        drop(snapshot);

        assert!(!path.exists());
    }

    #[test]
    fn test_missing_source_fails_and_leaves_no_temp_file() {
        let source_dir = tempfile::tempdir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("History");

        let result = Snapshot::prepare_in(temp_dir.path(), &source, false);

        assert!(matches!(result, Err(Error::Prepare { .. })));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
