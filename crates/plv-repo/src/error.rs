use plv_index::IndexError;
use plv_store::StoreError;
use plv_types::EntityKind;
use thiserror::Error;

/// Errors from repository, query, and codec operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No body is stored under the ID.
    #[error("no record stored under {0}")]
    NotFound(String),

    /// A stored body or payload could not be decoded.
    #[error("failed to decode {kind}: {reason}")]
    Decode { kind: EntityKind, reason: String },

    /// A record or listing could not be serialized.
    #[error("failed to encode {what}: {reason}")]
    Encode { what: String, reason: String },

    /// Reading an entity body failed.
    #[error("failed to read {key}: {source}")]
    StorageRead {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Writing an entity body failed.
    #[error("failed to write {key}: {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Index maintenance failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

pub type RepoResult<T> = Result<T, RepoError>;
