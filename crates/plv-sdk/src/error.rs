use std::fmt;

use thiserror::Error;

use plv_index::IndexError;
use plv_repo::RepoError;
use plv_types::EntityKind;

#[derive(Debug, Error)]
pub enum PlvError {
    #[error("invalid arguments: {0}")]
    Argument(String),

    #[error("image owner is not a registered user: {0}")]
    UnknownOwner(String),

    #[error("refusing to bootstrap: {kind} index already holds {count} IDs")]
    LiveData { kind: EntityKind, count: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<IndexError> for PlvError {
    fn from(e: IndexError) -> Self {
        Self::Repo(RepoError::Index(e))
    }
}

pub type PlvResult<T> = Result<T, PlvError>;

/// Stable, transport-facing classification of a [`PlvError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    Decode,
    Encode,
    StorageRead,
    StorageWrite,
    DuplicateId,
    NotFound,
    ReservedId,
    UninitializedIndex,
    LiveData,
    UnknownOwner,
    Config,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Argument => "ArgumentError",
            Self::Decode => "DecodeError",
            Self::Encode => "EncodeError",
            Self::StorageRead => "StorageReadError",
            Self::StorageWrite => "StorageWriteError",
            Self::DuplicateId => "DuplicateIDError",
            Self::NotFound => "NotFoundError",
            Self::ReservedId => "ReservedIDError",
            Self::UninitializedIndex => "UninitializedIndexError",
            Self::LiveData => "LiveDataError",
            Self::UnknownOwner => "UnknownOwnerError",
            Self::Config => "ConfigError",
            Self::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlvError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) => ErrorKind::Argument,
            Self::UnknownOwner(_) => ErrorKind::UnknownOwner,
            Self::LiveData { .. } => ErrorKind::LiveData,
            Self::Config(_) => ErrorKind::Config,
            Self::Repo(e) => repo_kind(e),
        }
    }
}

fn repo_kind(e: &RepoError) -> ErrorKind {
    match e {
        RepoError::NotFound(_) => ErrorKind::NotFound,
        RepoError::Decode { .. } => ErrorKind::Decode,
        RepoError::Encode { .. } => ErrorKind::Encode,
        RepoError::StorageRead { .. } => ErrorKind::StorageRead,
        RepoError::StorageWrite { .. } => ErrorKind::StorageWrite,
        RepoError::Index(e) => index_kind(e),
    }
}

fn index_kind(e: &IndexError) -> ErrorKind {
    match e {
        IndexError::Read { .. } => ErrorKind::StorageRead,
        IndexError::Write { .. } => ErrorKind::StorageWrite,
        IndexError::Uninitialized { .. } => ErrorKind::UninitializedIndex,
        IndexError::Decode { .. } => ErrorKind::Decode,
        IndexError::Encode(_) => ErrorKind::Encode,
        IndexError::DuplicateId { .. } => ErrorKind::DuplicateId,
        IndexError::ReservedId(_) => ErrorKind::ReservedId,
        IndexError::EmptyId => ErrorKind::Argument,
        IndexError::InvalidRegistry(_) => ErrorKind::Config,
        IndexError::LockPoisoned => ErrorKind::Internal,
    }
}
