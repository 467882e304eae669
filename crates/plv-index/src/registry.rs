//! Mapping from entity kind to the ledger key of its ID index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use plv_types::EntityKind;

use crate::error::{IndexError, IndexResult};

/// Explicit kind-to-key mapping for ID indexes.
///
/// Every [`EntityKind`] maps to exactly one non-empty key and no two kinds
/// share a key. The mapping is validated on construction and on
/// deserialization, so lookups are infallible afterwards.
///
/// In TOML it reads as a plain table:
///
/// ```toml
/// [indexes]
/// user = "users"
/// image = "images"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct IndexRegistry {
    keys: BTreeMap<EntityKind, String>,
}

impl IndexRegistry {
    /// Build a registry from an explicit mapping.
    pub fn new(keys: BTreeMap<EntityKind, String>) -> IndexResult<Self> {
        for kind in EntityKind::ALL {
            match keys.get(&kind) {
                None => {
                    return Err(IndexError::InvalidRegistry(format!(
                        "no index key for {kind}"
                    )))
                }
                Some(key) if key.is_empty() => {
                    return Err(IndexError::InvalidRegistry(format!(
                        "empty index key for {kind}"
                    )))
                }
                Some(_) => {}
            }
        }

        let mut seen: Vec<&str> = Vec::with_capacity(keys.len());
        for key in keys.values() {
            if seen.contains(&key.as_str()) {
                return Err(IndexError::InvalidRegistry(format!(
                    "index key {key} used by more than one kind"
                )));
            }
            seen.push(key.as_str());
        }

        Ok(Self { keys })
    }

    /// Replace the key of one kind, re-validating the mapping.
    pub fn with_key(mut self, kind: EntityKind, key: impl Into<String>) -> IndexResult<Self> {
        self.keys.insert(kind, key.into());
        Self::new(self.keys)
    }

    /// Ledger key of `kind`'s index.
    pub fn key(&self, kind: EntityKind) -> &str {
        self.keys
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_index_key())
    }

    /// Returns `true` if `key` names any index.
    pub fn is_index_key(&self, key: &str) -> bool {
        self.keys.values().any(|k| k == key)
    }

    /// All `(kind, key)` pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &str)> {
        self.keys.iter().map(|(kind, key)| (*kind, key.as_str()))
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self {
            keys: EntityKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_index_key().to_string()))
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, String>> for IndexRegistry {
    type Error = IndexError;

    fn try_from(table: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut keys = BTreeMap::new();
        for (name, key) in table {
            let kind: EntityKind = name
                .parse()
                .map_err(|e: plv_types::TypeError| IndexError::InvalidRegistry(e.to_string()))?;
            keys.insert(kind, key);
        }
        Self::new(keys)
    }
}

impl From<IndexRegistry> for BTreeMap<String, String> {
    fn from(registry: IndexRegistry) -> Self {
        registry
            .keys
            .into_iter()
            .map(|(kind, key)| (kind.as_str().to_string(), key))
            .collect()
    }
}
