use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::Ledger;

/// In-memory, HashMap-based ledger.
///
/// Intended for tests and embedding. Values are held behind a `RwLock` and
/// cloned on read/write. The ledger counts successful writes and can be told
/// to fail reads or writes for specific keys, which lets callers exercise
/// their error paths without a real backend.
pub struct InMemoryLedger {
    values: RwLock<HashMap<String, Vec<u8>>>,
    writes: AtomicU64,
    faults: RwLock<Faults>,
}

#[derive(Default)]
struct Faults {
    reads: HashSet<String>,
    writes: HashSet<String>,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            writes: AtomicU64::new(0),
            faults: RwLock::new(Faults::default()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of every stored key.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Number of successful `put` calls since creation.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent `get` of `key` fail.
    pub fn fail_reads(&self, key: impl Into<String>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.reads.insert(key.into());
        }
    }

    /// Make every subsequent `put` to `key` fail.
    pub fn fail_writes(&self, key: impl Into<String>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.writes.insert(key.into());
        }
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        if let Ok(mut faults) = self.faults.write() {
            faults.reads.clear();
            faults.writes.clear();
        }
    }

    fn read_faulted(&self, key: &str) -> StoreResult<bool> {
        let faults = self.faults.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(faults.reads.contains(key))
    }

    fn write_faulted(&self, key: &str) -> StoreResult<bool> {
        let faults = self.faults.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(faults.writes.contains(key))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for InMemoryLedger {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.read_faulted(key)? {
            return Err(StoreError::read(key, "injected read fault"));
        }
        let map = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if self.write_faulted(key)? {
            return Err(StoreError::write(key, "injected write fault"));
        }
        let mut map = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(key, bytes = value.len(), "ledger put");
        Ok(())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        if self.read_faulted(key)? {
            return Err(StoreError::read(key, "injected read fault"));
        }
        let map = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("key_count", &self.len())
            .field("write_count", &self.write_count())
            .finish()
    }
}
