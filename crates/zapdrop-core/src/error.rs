use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZapdropError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload not found: {path}")]
    UploadMissing { path: String },

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ZapdropError>;
