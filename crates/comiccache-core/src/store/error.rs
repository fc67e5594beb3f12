use thiserror::Error;

/// Failures of the local store.
///
/// These are not expected during normal operation; callers treat them as
/// fatal instead of showing them as a recoverable comic error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database lock poisoned by a panicked writer")]
    Poisoned,

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
