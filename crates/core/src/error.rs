use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for TimelineError {
    fn from(err: config::ConfigError) -> Self {
        TimelineError::Config(err.to_string())
    }
}
