use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::Ledger;

/// Directory-backed ledger: one file per key.
///
/// File names are the hex encoding of the key, so any key (including ones
/// with path separators) maps to a single flat file. Writes go to a temp
/// file in the same directory and are renamed into place, which keeps each
/// `put` atomic for readers.
#[derive(Debug, Clone)]
pub struct DirLedger {
    root: PathBuf,
}

impl DirLedger {
    /// Open (or create) a ledger rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(hex::encode(key.as_bytes()))
    }
}

impl Ledger for DirLedger {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::read(key, e.to_string())),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let target = self.path_for(key);
        let mut tmp =
            NamedTempFile::new_in(&self.root).map_err(|e| StoreError::write(key, e.to_string()))?;
        tmp.write_all(value)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StoreError::write(key, e.to_string()))?;
        tmp.persist(&target)
            .map_err(|e| StoreError::write(key, e.error.to_string()))?;
        debug!(key, path = %target.display(), bytes = value.len(), "ledger put");
        Ok(())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.path_for(key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = DirLedger::open(dir.path()).unwrap();

        ledger.put("images", b"[\"img-1\"]").unwrap();
        assert_eq!(ledger.get("images").unwrap().unwrap(), b"[\"img-1\"]");
        assert!(ledger.contains("images").unwrap());
    }

    #[test]
    fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = DirLedger::open(dir.path()).unwrap();
        assert!(ledger.get("users").unwrap().is_none());
        assert!(!ledger.contains("users").unwrap());
    }

    #[test]
    fn keys_with_separators_stay_flat() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = DirLedger::open(dir.path()).unwrap();

        ledger.put("../escape/attempt", b"x").unwrap();
        assert_eq!(ledger.get("../escape/attempt").unwrap().unwrap(), b"x");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = DirLedger::open(dir.path()).unwrap();
        ledger.put("k", b"one").unwrap();
        ledger.put("k", b"two").unwrap();
        assert_eq!(ledger.get("k").unwrap().unwrap(), b"two");
    }

    #[test]
    fn reopen_sees_previous_writes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let ledger = DirLedger::open(dir.path()).unwrap();
            ledger.put("alice", b"{}").unwrap();
        }
        let reopened = DirLedger::open(dir.path()).unwrap();
        assert_eq!(reopened.get("alice").unwrap().unwrap(), b"{}");
    }

    #[test]
    fn open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let ledger = DirLedger::open(&nested).unwrap();
        assert!(ledger.root().is_dir());
    }
}
