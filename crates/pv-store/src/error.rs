/// Errors from slot store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Slot name contains path separators or is empty.
    #[error("invalid slot name: {0:?}")]
    InvalidSlotName(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Atomic rename into place failed.
    #[error("failed to persist slot {slot}: {reason}")]
    PersistFailed { slot: String, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
