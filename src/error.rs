//! Error taxonomy for the persistence layer and the controllers.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by [`crate::db::RecordStore`]. A missing row on update or
/// delete is not represented here because it is not a failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file (or its directory) could not be opened.
    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A statement was rejected by SQLite.
    #[error("failed to {action}: {source}")]
    StatementFailure {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub(crate) fn statement(action: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::StatementFailure { action, source }
    }
}

/// Failures from the create-screen controller.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("birth date must be YYYY-MM-DD, got {0:?}")]
    InvalidBirthDate(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
