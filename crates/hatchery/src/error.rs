// Error types for catalog and job operations

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("dataset already exists: {0}")]
    Conflict(String),

    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("generation job failed (exit {exit_code}): {logs}")]
    Execution { exit_code: i64, logs: String },

    #[error("container platform error: {0}")]
    Platform(String),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
