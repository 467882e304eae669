use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kind::EntityKind;

/// A record stored in the ledger under its own string ID.
///
/// The ID doubles as the ledger key of the record body, so it shares one
/// flat namespace with the index keys.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync {
    /// Index this entity is registered in.
    const KIND: EntityKind;

    /// The entity's ID (ledger key of its body).
    fn id(&self) -> &str;

    /// Reconcile a decoded record with the key it was read from.
    ///
    /// Called by full scans after decoding each body. The default keeps the
    /// record untouched.
    fn adopt_key(&mut self, key: &str) {
        let _ = key;
    }
}

/// Decode a JSON `null` sequence as an empty `Vec`.
///
/// Listings and indexes written by older clients encode an empty sequence
/// as `null` rather than `[]`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
