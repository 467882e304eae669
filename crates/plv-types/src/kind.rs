use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of entity a record belongs to.
///
/// Each kind owns exactly one ordered ID index in the ledger. The index key
/// is resolved through a registry in `plv-index`; [`default_index_key`]
/// only supplies the conventional names.
///
/// [`default_index_key`]: EntityKind::default_index_key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Image,
}

impl EntityKind {
    /// Every entity kind, in bootstrap order.
    pub const ALL: [EntityKind; 2] = [EntityKind::User, EntityKind::Image];

    /// Conventional ledger key of this kind's ID index.
    pub const fn default_index_key(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Image => "images",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "users" => Ok(Self::User),
            "image" | "images" => Ok(Self::Image),
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}
