// HTTP API for browser history

pub mod error;
pub mod handler;
pub mod server;

pub use error::{Error, Result};
pub use handler::HistoryHandler;
pub use server::HistoryServer;
