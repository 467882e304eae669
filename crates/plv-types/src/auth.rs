use serde::{Deserialize, Serialize};

use crate::user::User;

/// Outcome of resolving a username in the ledger.
///
/// Keeps "no such user" apart from "the lookup itself failed" so callers can
/// branch before handing the result to the authenticator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserLookup {
    Found(User),
    NotFound,
    /// The read or decode failed; carries the reason for logging.
    Failed(String),
}

impl UserLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The resolved user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Found(user) => Some(user),
            Self::NotFound | Self::Failed(_) => None,
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Found(user) => Some(user),
            Self::NotFound | Self::Failed(_) => None,
        }
    }
}

/// Transient result of a password check. Never persisted.
///
/// When the user could not be resolved, `user` is the empty [`User`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResult {
    #[serde(rename = "User")]
    pub user: User,
    #[serde(rename = "Authenticated")]
    pub authenticated: bool,
}

impl AuthenticationResult {
    pub fn granted(user: User) -> Self {
        Self { user, authenticated: true }
    }

    pub fn denied(user: User) -> Self {
        Self { user, authenticated: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_accessors() {
        let found = UserLookup::Found(User::new("a", "p", "Employee"));
        assert!(found.is_found());
        assert_eq!(found.user().map(|u| u.username.as_str()), Some("a"));

        assert!(UserLookup::NotFound.user().is_none());
        assert!(UserLookup::Failed("io".into()).into_user().is_none());
    }

    #[test]
    fn result_wire_names() {
        let result = AuthenticationResult::granted(User::new("a", "p", "Employee"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["Authenticated"], true);
        assert_eq!(json["User"]["username"], "a");
    }

    #[test]
    fn denied_keeps_user() {
        let result = AuthenticationResult::denied(User::default());
        assert!(!result.authenticated);
        assert!(result.user.is_empty());
    }
}
