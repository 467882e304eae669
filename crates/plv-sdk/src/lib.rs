//! High-level SDK for the Picture License Verifier.
//!
//! Provides the entity-specific operations (register a user, demand and
//! deliver an image, authenticate) on top of `plv-repo`, the guarded
//! bootstrap that creates the ID indexes, and the [`Dispatcher`] that maps
//! named operations with positional string arguments onto them. This is the
//! main entry point for hosts embedding PLV.

pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod service;

pub use bootstrap::{BootstrapMode, BootstrapReport};
pub use config::PlvConfig;
pub use dispatch::{Dispatcher, Operation};
pub use error::{ErrorKind, PlvError, PlvResult};
pub use service::Plv;

// Re-export key types
pub use plv_index::{IndexRegistry, IndexWriteMode};
pub use plv_repo::StatusCounts;
pub use plv_store::{DirLedger, InMemoryLedger, Ledger};
pub use plv_types::{AuthenticationResult, EntityKind, Image, ImageStatus, User, UserLookup};
