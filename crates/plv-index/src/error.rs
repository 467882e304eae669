//! Error types for the index crate.

use plv_store::StoreError;
use plv_types::EntityKind;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The ledger read of the index failed.
    #[error("failed to read index {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The ledger write of the index failed.
    #[error("failed to write index {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Nothing was ever stored under the index key.
    #[error("index {key} is not initialized")]
    Uninitialized { key: String },

    /// The stored bytes are not a sequence of strings.
    #[error("failed to decode index {key}: {reason}")]
    Decode { key: String, reason: String },

    /// The sequence could not be serialized.
    #[error("failed to encode index: {0}")]
    Encode(String),

    /// The ID is already registered in the index.
    #[error("ID already exists in {kind} index: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    /// The ID would collide with an index key in the flat key namespace.
    #[error("ID {0} is reserved as an index key")]
    ReservedId(String),

    /// IDs must be non-empty.
    #[error("ID must not be empty")]
    EmptyId,

    /// The kind-to-key mapping is incomplete or ambiguous.
    #[error("invalid index registry: {0}")]
    InvalidRegistry(String),

    /// The in-process write lock was poisoned.
    #[error("index write lock poisoned")]
    LockPoisoned,
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
