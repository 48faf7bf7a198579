use crate::platform::{InstallLocation, Platform, UserDirs};
use crate::profile::ProfilePath;
use crate::Result;
use browser_history_core::TimeWindow;
use browser_history_core::history::HistoryEntry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Database schema family a browser stores its history in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Chromium,
    Gecko,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Chromium => "chromium",
            Family::Gecko => "gecko",
        }
    }
}

/// Profile discovery and history extraction for one schema family.
///
/// Brands sharing a family share a single strategy object and differ only in
/// where their user data lives.
pub trait HistorySource: Send + Sync {
    fn family(&self) -> Family;

    /// Find every profile with a history database under `base_dir`
    fn discover(&self, browser: &str, base_dir: &Path) -> Result<Vec<ProfilePath>>;

    /// Read the entries of `snapshot` that fall inside `window`, newest first
    fn extract(
        &self,
        snapshot: &Path,
        profile: &str,
        window: &TimeWindow,
        diagnostics: bool,
    ) -> Result<Vec<HistoryEntry>>;
}

#[derive(Debug, Clone)]
enum BaseDir {
    Installed(InstallLocation),
    Fixed(PathBuf),
}

/// A named browser: where its profiles live plus the strategy that reads them
#[derive(Clone)]
pub struct Browser {
    name: String,
    base_dir: BaseDir,
    source: Arc<dyn HistorySource>,
}

impl Browser {
    /// Browser whose data lives at the platform's standard install location
    pub fn installed(
        name: impl Into<String>,
        location: InstallLocation,
        source: Arc<dyn HistorySource>,
    ) -> Self {
        Self {
            name: name.into(),
            base_dir: BaseDir::Installed(location),
            source,
        }
    }

    /// Browser whose user data directory is known up front
    pub fn at(
        name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        source: Arc<dyn HistorySource>,
    ) -> Self {
        Self {
            name: name.into(),
            base_dir: BaseDir::Fixed(base_dir.into()),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> Family {
        self.source.family()
    }

    /// User data directory for this browser on the current platform
    pub fn base_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            BaseDir::Fixed(dir) => Ok(dir.clone()),
            BaseDir::Installed(location) => {
                location.base_dir(Platform::current()?, &UserDirs::detect())
            }
        }
    }

    /// Discover the history databases of every profile of this browser
    pub fn history_paths(&self) -> Result<Vec<ProfilePath>> {
        let base_dir = self.base_dir()?;
        tracing::debug!("Looking for {} profiles in {}", self.name, base_dir.display());
        self.source.discover(&self.name, &base_dir)
    }

    pub fn extract(
        &self,
        snapshot: &Path,
        profile: &str,
        window: &TimeWindow,
        diagnostics: bool,
    ) -> Result<Vec<HistoryEntry>> {
        self.source.extract(snapshot, profile, window, diagnostics)
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("name", &self.name)
            .field("family", &self.family())
            .field("base_dir", &self.base_dir)
            .finish()
    }
}
