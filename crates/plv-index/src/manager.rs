//! The [`IndexManager`]: ordered, duplicate-free ID lists per entity kind.
//!
//! Each index lives in the ledger as a single value, so every mutation is a
//! read-modify-write of that value. The ledger offers no multi-key
//! transactions and this manager adds none: two writers that append to the
//! same index concurrently can both read the same snapshot, and the later
//! `put` silently drops the earlier append. Either the host serializes
//! writes to the same key ([`IndexWriteMode::HostOrdered`], the default) or
//! the manager is shared and configured with
//! [`IndexWriteMode::InProcessLock`].

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use plv_store::Ledger;
use plv_types::EntityKind;

use crate::codec::IndexCodec;
use crate::error::{IndexError, IndexResult};
use crate::registry::IndexRegistry;

/// How index read-modify-write cycles are protected from lost updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexWriteMode {
    /// The host platform orders writes to the same key; conflicting writes
    /// are rejected by the host rather than silently merged. Neither
    /// reference ledger does this, so a host that runs calls concurrently
    /// over `InMemoryLedger` or `DirLedger` loses appends in this mode.
    #[default]
    HostOrdered,
    /// Hold a mutex across each read-modify-write. Only protects writers
    /// that share this manager instance; separate processes over one
    /// `DirLedger` still race. The HTTP server always uses this mode.
    InProcessLock,
}

/// Maintains one ordered ID index per [`EntityKind`].
pub struct IndexManager {
    ledger: Arc<dyn Ledger>,
    registry: IndexRegistry,
    mode: IndexWriteMode,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("registry", &self.registry)
            .field("mode", &self.mode)
            .finish()
    }
}

impl IndexManager {
    /// Create a manager over `ledger` using the given kind-to-key mapping.
    pub fn new(ledger: Arc<dyn Ledger>, registry: IndexRegistry) -> Self {
        Self {
            ledger,
            registry,
            mode: IndexWriteMode::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_write_mode(mut self, mode: IndexWriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    pub fn write_mode(&self) -> IndexWriteMode {
        self.mode
    }

    /// Ledger key of `kind`'s index.
    pub fn key(&self, kind: EntityKind) -> &str {
        self.registry.key(kind)
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Read the ordered ID sequence of `kind`.
    ///
    /// An index that was never written is [`IndexError::Uninitialized`],
    /// not an empty sequence: bootstrap must have run first.
    pub fn get_index(&self, kind: EntityKind) -> IndexResult<Vec<String>> {
        let key = self.key(kind);
        let bytes = self
            .ledger
            .get(key)
            .map_err(|source| IndexError::Read {
                key: key.to_string(),
                source,
            })?
            .ok_or_else(|| IndexError::Uninitialized {
                key: key.to_string(),
            })?;
        let ids = IndexCodec::decode(key, &bytes)?;
        debug!(%kind, key, len = ids.len(), "read index");
        Ok(ids)
    }

    /// Returns `true` if `id` is registered in `kind`'s index. Linear scan.
    pub fn id_exists(&self, kind: EntityKind, id: &str) -> IndexResult<bool> {
        Ok(self.get_index(kind)?.iter().any(|existing| existing == id))
    }

    /// Returns `true` if anything has been written under `kind`'s index key.
    pub fn is_initialized(&self, kind: EntityKind) -> IndexResult<bool> {
        let key = self.key(kind);
        self.ledger.contains(key).map_err(|source| IndexError::Read {
            key: key.to_string(),
            source,
        })
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Append `id` to the end of `kind`'s index and return it.
    ///
    /// Fails with [`IndexError::DuplicateId`] without writing anything if the
    /// ID is already registered. Insertion order is the iteration order of
    /// every later scan.
    pub fn add_id(&self, kind: EntityKind, id: &str) -> IndexResult<String> {
        self.validate_id(id)?;
        let _guard = self.lock()?;

        let mut ids = self.get_index(kind)?;
        if ids.iter().any(|existing| existing == id) {
            return Err(IndexError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }

        ids.push(id.to_string());
        self.write(kind, &ids)?;
        info!(%kind, id, len = ids.len(), "registered ID");
        Ok(id.to_string())
    }

    /// Overwrite `kind`'s index with the empty sequence.
    ///
    /// Destructive: bodies of previously registered IDs stay in the ledger
    /// but can no longer be reached through the index.
    pub fn reset(&self, kind: EntityKind) -> IndexResult<()> {
        let _guard = self.lock()?;
        self.write(kind, &[])?;
        info!(%kind, key = self.key(kind), "reset index");
        Ok(())
    }

    fn write(&self, kind: EntityKind, ids: &[String]) -> IndexResult<()> {
        let key = self.key(kind);
        let bytes = IndexCodec::encode(ids)?;
        self.ledger
            .put(key, &bytes)
            .map_err(|source| IndexError::Write {
                key: key.to_string(),
                source,
            })
    }

    fn validate_id(&self, id: &str) -> IndexResult<()> {
        if id.is_empty() {
            return Err(IndexError::EmptyId);
        }
        if self.registry.is_index_key(id) {
            return Err(IndexError::ReservedId(id.to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> IndexResult<Option<MutexGuard<'_, ()>>> {
        match self.mode {
            IndexWriteMode::HostOrdered => Ok(None),
            IndexWriteMode::InProcessLock => self
                .write_lock
                .lock()
                .map(Some)
                .map_err(|_| IndexError::LockPoisoned),
        }
    }
}
