use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("could not determine the user's home or application data directory")]
    HomeDirectory,

    #[error("no {browser} profiles found in {}", dir.display())]
    NoProfiles { browser: String, dir: PathBuf },

    #[error("failed to load profile configuration {}: {source}", path.display())]
    ProfileConfig {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to prepare database file {}: {source}", path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open history database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to query history database {}: {source}", path.display())]
    Query {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to scan history row from {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("no valid browsers specified")]
    NoValidBrowsers,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
