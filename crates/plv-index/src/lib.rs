//! ID index maintenance for the Picture License Verifier.
//!
//! The ledger cannot enumerate keys, so every entity kind keeps its own
//! ordered list of registered IDs under a well-known key. This crate owns
//! that list: how it is named, how it is encoded, and how it grows.
//!
//! # Key Types
//!
//! - [`IndexRegistry`] -- Mapping from [`EntityKind`](plv_types::EntityKind) to index key
//! - [`IndexCodec`] -- Encode/decode pair for the stored ID sequence
//! - [`IndexManager`] -- Read, append-with-uniqueness, and reset operations
//! - [`IndexWriteMode`] -- Whether index writes are serialized in-process

pub mod codec;
pub mod error;
pub mod manager;
pub mod registry;

pub use codec::IndexCodec;
pub use error::{IndexError, IndexResult};
pub use manager::{IndexManager, IndexWriteMode};
pub use registry::IndexRegistry;
