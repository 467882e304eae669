use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::kind::EntityKind;

/// A registered account.
///
/// The password is an opaque secret compared verbatim; it is never hashed
/// by this layer. Missing fields decode as empty strings so payloads that
/// only carry a subset of the attributes are still accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub username: String,
    pub password: String,
    /// Free-form role tag (e.g. "Employee", "Marketing").
    #[serde(rename = "participant-type")]
    pub participant_type: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        participant_type: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            participant_type: participant_type.into(),
        }
    }

    /// Returns `true` if every attribute is empty.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty() && self.participant_type.is_empty()
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.username
    }

    /// Registration stores the caller's payload verbatim under the username
    /// key, so the key is authoritative for the username.
    fn adopt_key(&mut self, key: &str) {
        self.username = key.to_string();
    }
}

/// Wire wrapper for user listings: `{"users": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default, deserialize_with = "crate::entity::null_as_empty")]
    pub users: Vec<User>,
}
