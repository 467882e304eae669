use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid image status: {0}")]
    InvalidStatus(u8),

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
}
