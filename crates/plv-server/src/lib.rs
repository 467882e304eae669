//! HTTP server for the Picture License Verifier.
//!
//! Exposes the named operations of `plv-sdk` over two JSON endpoints,
//! `POST /v1/invoke` and `POST /v1/query`, each taking
//! `{"function": "...", "args": [...]}`. Successful queries return the
//! operation's JSON payload; successful mutations return `204 No Content`.
//! Failures return `{"kind": "...", "message": "..."}` with a status code
//! derived from the error kind.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{LedgerBackend, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{ApiError, CallRequest};
pub use server::PlvServer;
