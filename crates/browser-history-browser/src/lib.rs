//! Locating, snapshotting and reading browser history databases.
//!
//! The pipeline for one request is: [`Registry`] selects browsers, each
//! [`Browser`] discovers its [`ProfilePath`]s, every profile database is
//! copied into a [`Snapshot`], and the browser's [`HistorySource`] reads the
//! snapshot. [`Aggregator`] drives the whole thing and merges the results.

mod aggregator;
pub mod chromium;
mod error;
pub mod gecko;
pub mod platform;
mod profile;
mod registry;
mod snapshot;
mod source;
mod sqlite;
pub mod transition;

pub use aggregator::Aggregator;
pub use chromium::Chromium;
pub use error::{Error, Result};
pub use gecko::Gecko;
pub use platform::{InstallLocation, Platform, UserDirs};
pub use profile::ProfilePath;
pub use registry::Registry;
pub use snapshot::Snapshot;
pub use source::{Browser, Family, HistorySource};
