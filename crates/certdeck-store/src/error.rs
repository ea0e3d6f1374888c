//! Store and storage error types.

use certdeck_common::error::ErrorCode;

/// Failure reported by a [`DurableStore`](crate::storage::DurableStore) adapter.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The persisted collection was unreadable. Construction recovers from
    /// this by starting empty; it is only ever observed through
    /// `CertificateStore::load_error` and `StoreEvent::LoadFailed`.
    #[error("could not load '{key}': {reason}")]
    PersistenceRead { key: String, reason: String },

    /// The durable write failed. The in-memory collection already holds the
    /// change, so memory and storage disagree until a later write succeeds.
    #[error("could not save '{key}': {source}")]
    PersistenceWrite {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no certificate matches '{0}'")]
    NotFound(String),

    #[error("'{0}' matches more than one certificate")]
    AmbiguousId(String),
}

impl From<&StoreError> for ErrorCode {
    fn from(e: &StoreError) -> Self {
        match e {
            StoreError::PersistenceRead { .. } => ErrorCode::ParseError,
            StoreError::PersistenceWrite { .. } => ErrorCode::IoError,
            StoreError::Serialize(_) => ErrorCode::Internal,
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::AmbiguousId(_) => ErrorCode::AmbiguousId,
        }
    }
}
