use crate::{Error, Result};
use std::path::PathBuf;

/// Desktop operating systems with known browser data locations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a platform identifier (as in `std::env::consts::OS`) to a platform
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// User directories the browser locations are relative to
#[derive(Debug, Clone, Default)]
pub struct UserDirs {
    pub home: Option<PathBuf>,
    /// `%LOCALAPPDATA%` on Windows
    pub local_data: Option<PathBuf>,
    /// `%APPDATA%` on Windows
    pub roaming_data: Option<PathBuf>,
}

impl UserDirs {
    pub fn detect() -> Self {
        Self {
            home: dirs::home_dir(),
            local_data: dirs::data_local_dir(),
            roaming_data: dirs::data_dir(),
        }
    }
}

/// Which Windows application data root a browser stores its profiles under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowsRoot {
    Local,
    Roaming,
}

/// Per-platform location of a browser's user data directory.
///
/// Components are joined one by one so the same table works with either
/// path separator.
#[derive(Debug, Clone, Copy)]
pub struct InstallLocation {
    pub windows_root: WindowsRoot,
    pub windows: &'static [&'static str],
    /// Relative to the home directory
    pub macos: &'static [&'static str],
    /// Relative to the home directory
    pub linux: &'static [&'static str],
}

impl InstallLocation {
    pub const CHROME: Self = Self {
        windows_root: WindowsRoot::Local,
        windows: &["Google", "Chrome", "User Data"],
        macos: &["Library", "Application Support", "Google", "Chrome"],
        linux: &[".config", "google-chrome"],
    };

    pub const EDGE: Self = Self {
        windows_root: WindowsRoot::Local,
        windows: &["Microsoft", "Edge", "User Data"],
        macos: &["Library", "Application Support", "Microsoft Edge"],
        linux: &[".config", "microsoft-edge"],
    };

    pub const BRAVE: Self = Self {
        windows_root: WindowsRoot::Local,
        windows: &["BraveSoftware", "Brave-Browser", "User Data"],
        macos: &["Library", "Application Support", "BraveSoftware", "Brave-Browser"],
        linux: &[".config", "BraveSoftware", "Brave-Browser"],
    };

    pub const CHROMIUM: Self = Self {
        windows_root: WindowsRoot::Local,
        windows: &["Chromium", "User Data"],
        macos: &["Library", "Application Support", "Chromium"],
        linux: &[".config", "chromium"],
    };

    pub const FIREFOX: Self = Self {
        windows_root: WindowsRoot::Roaming,
        windows: &["Mozilla", "Firefox"],
        macos: &["Library", "Application Support", "Firefox"],
        linux: &[".mozilla", "firefox"],
    };

    /// Resolve the base directory for `platform` from the given user directories
    pub fn base_dir(&self, platform: Platform, dirs: &UserDirs) -> Result<PathBuf> {
        let (root, components) = match platform {
            Platform::Windows => {
                let root = match self.windows_root {
                    WindowsRoot::Local => dirs.local_data.as_ref(),
                    WindowsRoot::Roaming => dirs.roaming_data.as_ref(),
                };
                (root, self.windows)
            }
            Platform::MacOs => (dirs.home.as_ref(), self.macos),
            Platform::Linux => (dirs.home.as_ref(), self.linux),
        };

        let root = root.ok_or(Error::HomeDirectory)?;
        Ok(components
            .iter()
            .fold(root.clone(), |path, component| path.join(component)))
    }
}
