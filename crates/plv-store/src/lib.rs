//! Ledger adapter for the Picture License Verifier.
//!
//! The ledger of record is an opaque key-value store: single-key atomic
//! `get`/`put`, no iteration, no multi-key transactions. This crate defines
//! that boundary as the [`Ledger`] trait and ships two reference backends.
//!
//! # Backends
//!
//! - [`InMemoryLedger`] -- `HashMap`-based ledger for tests and embedding,
//!   with write accounting and injectable faults
//! - [`DirLedger`] -- one file per key under a directory, used by the CLI
//!
//! # Design Rules
//!
//! 1. The ledger never interprets values -- it is a pure key-value store.
//! 2. A missing key is `Ok(None)`, not an error.
//! 3. All I/O errors are propagated with the key they concern.

pub mod dir;
pub mod error;
pub mod memory;
pub mod traits;

pub use dir::DirLedger;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryLedger;
pub use traits::Ledger;
