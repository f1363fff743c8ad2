use thiserror::Error;

/// Error type shared by the grading, fee and record layers.
#[derive(Debug, Error)]
pub enum SchoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Duplicate: {0}")]
    Duplicate(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Unsupported schema version {found} (latest supported: {supported})")]
    UnsupportedSchema { found: u8, supported: u8 },
    #[error("No record store loaded")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, SchoolError>;
