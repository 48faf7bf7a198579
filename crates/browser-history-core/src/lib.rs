pub mod config;
pub mod error;
pub mod history;

pub use config::{Config, OutputFormat, TimeWindow};
pub use error::{Error, Result};
