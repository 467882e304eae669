use crate::error::StoreResult;

/// Opaque key-value ledger of record.
///
/// All implementations must satisfy these invariants:
/// - `get` and `put` are atomic for a single key. Nothing spans two keys.
/// - Keys live in one flat namespace; the ledger attaches no meaning to them.
/// - Values are returned exactly as written.
/// - The ledger cannot enumerate or filter keys. Anything that needs to
///   list records must keep its own index.
pub trait Ledger: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing was ever written there.
    /// Returns `Err` on backend failure.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check whether a value is stored under `key`.
    ///
    /// Default implementation reads the value. Backends may override with a
    /// cheaper probe.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

