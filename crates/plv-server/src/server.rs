use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::warn;

use plv_sdk::{Dispatcher, IndexWriteMode, Plv};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// PLV HTTP server.
pub struct PlvServer {
    config: ServerConfig,
    dispatcher: Dispatcher,
}

impl PlvServer {
    /// Open the configured ledger. Indexes are not created here; run `init`
    /// through the dispatcher or the CLI first.
    ///
    /// Requests run concurrently and neither ledger backend orders writes,
    /// so index writes always go through [`IndexWriteMode::InProcessLock`].
    pub fn new(mut config: ServerConfig) -> ServerResult<Self> {
        if config.plv.index_write_mode != IndexWriteMode::InProcessLock {
            warn!(
                configured = ?config.plv.index_write_mode,
                "ledger backend does not order writes; using in-process index lock"
            );
            config.plv.index_write_mode = IndexWriteMode::InProcessLock;
        }
        let ledger = config.ledger.open()?;
        let plv = Plv::new(ledger, config.plv.clone());
        Ok(Self {
            config,
            dispatcher: Dispatcher::new(Arc::new(plv)),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.dispatcher.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(ledger = ?self.config.ledger, "PLV server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerBackend;

    #[test]
    fn server_construction() {
        let server = PlvServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr.port(), 7054);
        let _router = server.router();
    }

    #[test]
    fn index_writes_are_locked() {
        let server = PlvServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().plv.index_write_mode, IndexWriteMode::InProcessLock);
        assert_eq!(
            server.dispatcher().plv().repository().indexes().write_mode(),
            IndexWriteMode::InProcessLock
        );
    }

    #[test]
    fn concurrent_demands_are_all_indexed() {
        let server = PlvServer::new(ServerConfig::default()).unwrap();
        server.dispatcher().invoke("init", &[]).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let dispatcher = server.dispatcher().clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let payload = format!(r#"{{"id":"img-{t}-{i}","user":"u{t}"}}"#);
                        dispatcher.invoke("DemandImage", &[payload]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ids = server
            .dispatcher()
            .plv()
            .repository()
            .indexes()
            .get_index(plv_sdk::EntityKind::Image)
            .unwrap();
        assert_eq!(ids.len(), 400);
    }

    #[test]
    fn dir_backend_shares_state_across_servers() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            ledger: LedgerBackend::Dir {
                path: dir.path().to_path_buf(),
            },
            ..ServerConfig::default()
        };

        let first = PlvServer::new(config.clone()).unwrap();
        first.dispatcher().invoke("init", &[]).unwrap();
        first
            .dispatcher()
            .invoke("addUser", &["alice".to_string(), "{}".to_string()])
            .unwrap();

        let second = PlvServer::new(config).unwrap();
        let users = second.dispatcher().query("getUsers", &[]).unwrap();
        assert_eq!(
            users,
            br#"{"users":[{"username":"alice","password":"","participant-type":""}]}"#
        );
    }
}
