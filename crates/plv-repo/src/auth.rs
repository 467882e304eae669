//! Password check against an already resolved user.

use subtle::ConstantTimeEq;
use tracing::debug;

use plv_types::{AuthenticationResult, User, UserLookup};

/// Compares a supplied password with the one stored on a [`User`].
///
/// Never fetches anything itself: callers resolve the user first (see
/// [`EntityRepository::lookup_user`](crate::EntityRepository::lookup_user))
/// and branch on "unknown user" before calling in if they need to tell it
/// apart from "wrong password".
pub struct Authenticator;

impl Authenticator {
    /// Authenticate against the outcome of a user lookup.
    ///
    /// An unresolved user (not found or failed lookup) is denied with the
    /// empty [`User`] embedded in the result.
    pub fn authenticate(lookup: UserLookup, supplied_password: &str) -> AuthenticationResult {
        match lookup {
            UserLookup::Found(user) => Self::check(user, supplied_password),
            UserLookup::NotFound | UserLookup::Failed(_) => {
                debug!("authentication denied: user not resolved");
                AuthenticationResult::denied(User::default())
            }
        }
    }

    /// Authenticate `user` directly. The empty user is always denied.
    pub fn check(user: User, supplied_password: &str) -> AuthenticationResult {
        if user.is_empty() {
            debug!("authentication denied: empty user");
            return AuthenticationResult::denied(user);
        }
        if !Self::password_matches(&user.password, supplied_password) {
            debug!(username = %user.username, "authentication denied: password mismatch");
            return AuthenticationResult::denied(user);
        }
        debug!(username = %user.username, "authenticated");
        AuthenticationResult::granted(user)
    }

    /// Exact string equality, evaluated in constant time for equal lengths.
    fn password_matches(stored: &str, supplied: &str) -> bool {
        stored.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}
