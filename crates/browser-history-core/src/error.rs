use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to write history output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize history output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("Invalid timestamp '{value}' (use RFC 3339)")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
