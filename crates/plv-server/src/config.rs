use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use plv_sdk::PlvConfig;
use plv_store::{DirLedger, InMemoryLedger, Ledger};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub ledger: LedgerBackend,
    pub plv: PlvConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 7054)),
            ledger: LedgerBackend::default(),
            plv: PlvConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(source: &str) -> ServerResult<Self> {
        toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }
}

/// Where the server keeps its ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Process-local; contents are lost on shutdown.
    #[default]
    Memory,
    /// One file per key under `path`.
    Dir { path: PathBuf },
}

impl LedgerBackend {
    pub fn open(&self) -> ServerResult<Arc<dyn Ledger>> {
        match self {
            Self::Memory => Ok(Arc::new(InMemoryLedger::new())),
            Self::Dir { path } => Ok(Arc::new(DirLedger::open(path)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plv_sdk::{EntityKind, IndexWriteMode};

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:7054".parse::<SocketAddr>().unwrap());
        assert_eq!(c.ledger, LedgerBackend::Memory);
        assert_eq!(c.plv, PlvConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn full_document() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"

            [ledger]
            backend = "dir"
            path = "/var/lib/plv"

            [plv]
            index_write_mode = "in-process-lock"
            validate_image_owner = true

            [plv.indexes]
            user = "u-index"
            image = "i-index"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(
            c.ledger,
            LedgerBackend::Dir {
                path: PathBuf::from("/var/lib/plv")
            }
        );
        assert_eq!(c.plv.index_write_mode, IndexWriteMode::InProcessLock);
        assert_eq!(c.plv.indexes.key(EntityKind::Image), "i-index");
    }

    #[test]
    fn unknown_backend_is_config_error() {
        let err = ServerConfig::from_toml_str("[ledger]\nbackend = \"s3\"").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn dir_backend_opens() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LedgerBackend::Dir {
            path: dir.path().join("ledger"),
        };
        let ledger = backend.open().unwrap();
        ledger.put("k", b"v").unwrap();
        assert_eq!(ledger.get("k").unwrap().unwrap(), b"v");
    }

    #[test]
    fn load_missing_file() {
        let err = ServerConfig::load("/nonexistent/plv.toml").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
