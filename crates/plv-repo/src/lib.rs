//! Entity repository for the Picture License Verifier.
//!
//! Builds typed storage on top of the ID indexes in `plv-index`: an entity
//! body is written under its own ID only after the ID has been registered,
//! and every listing is a full scan of the index followed by one ledger read
//! per member.
//!
//! # Modules
//!
//! - [`codec`] -- Encode/decode pair for entity bodies and listing payloads
//! - [`repository`] -- [`EntityRepository`]: store, fetch, overwrite, reset
//! - [`query`] -- [`QueryService`]: list-all, by-owner, predicate scans, counts
//! - [`auth`] -- [`Authenticator`]: password check against a resolved user
//! - [`error`] -- [`RepoError`]

pub mod auth;
pub mod codec;
pub mod error;
pub mod query;
pub mod repository;

pub use auth::Authenticator;
pub use codec::EntityCodec;
pub use error::{RepoError, RepoResult};
pub use query::{QueryService, StatusCounts};
pub use repository::EntityRepository;
