//! Foundation types for the Picture License Verifier (PLV).
//!
//! This crate provides the entity records stored in the ledger and the
//! transient values produced when querying them. Every other PLV crate
//! depends on `plv-types`.
//!
//! # Key Types
//!
//! - [`EntityKind`] -- Tag selecting the per-kind ID index (users, images)
//! - [`Entity`] -- Trait implemented by every record addressed by a string ID
//! - [`User`] -- A registered account with a verbatim password
//! - [`Image`] -- An image-license record and its [`ImageStatus`]
//! - [`UserLookup`] -- Result of resolving a username before authentication
//! - [`AuthenticationResult`] -- Outcome of a password check

pub mod auth;
pub mod entity;
pub mod error;
pub mod image;
pub mod kind;
pub mod user;

pub use auth::{AuthenticationResult, UserLookup};
pub use entity::Entity;
pub use error::TypeError;
pub use image::{Image, ImageList, ImageStatus};
pub use kind::EntityKind;
pub use user::{User, UserList};
