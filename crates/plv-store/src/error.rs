/// Errors from ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the value stored under `key` failed.
    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    /// Writing the value stored under `key` failed.
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A backend lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn read(key: &str, reason: impl Into<String>) -> Self {
        Self::Read {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn write(key: &str, reason: impl Into<String>) -> Self {
        Self::Write {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the failure happened on the write path.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Result alias for ledger operations.
pub type StoreResult<T> = Result<T, StoreError>;
