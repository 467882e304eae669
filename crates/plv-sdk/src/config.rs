use serde::{Deserialize, Serialize};

use plv_index::{IndexRegistry, IndexWriteMode};

use crate::error::{PlvError, PlvResult};

/// Configuration of the PLV layer.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlvConfig {
    /// Ledger key of each entity kind's ID index.
    pub indexes: IndexRegistry,
    /// Protection of index read-modify-write cycles.
    pub index_write_mode: IndexWriteMode,
    /// Reject demanded images whose owner is not a registered user.
    pub validate_image_owner: bool,
}

impl PlvConfig {
    pub fn from_toml_str(source: &str) -> PlvResult<Self> {
        toml::from_str(source).map_err(|e| PlvError::Config(e.to_string()))
    }
}
