//! Encode/decode pair for entity bodies and listing payloads.
//!
//! Kept apart from the index codec: index values are bare string arrays,
//! entity bodies are JSON records with hyphenated field names.

use serde::Serialize;

use plv_types::{AuthenticationResult, Entity, Image, ImageList, User, UserList};

use crate::error::{RepoError, RepoResult};

pub struct EntityCodec;

impl EntityCodec {
    pub fn encode<E: Entity>(entity: &E) -> RepoResult<Vec<u8>> {
        to_vec(entity, E::KIND.as_str())
    }

    pub fn decode<E: Entity>(bytes: &[u8]) -> RepoResult<E> {
        serde_json::from_slice(bytes).map_err(|e| RepoError::Decode {
            kind: E::KIND,
            reason: e.to_string(),
        })
    }

    /// `{"users": [...]}`
    pub fn encode_users(users: Vec<User>) -> RepoResult<Vec<u8>> {
        to_vec(&UserList { users }, "user list")
    }

    /// `{"images": [...]}`
    pub fn encode_images(images: Vec<Image>) -> RepoResult<Vec<u8>> {
        to_vec(&ImageList { images }, "image list")
    }

    /// `{"User": {...}, "Authenticated": bool}`
    pub fn encode_auth(result: &AuthenticationResult) -> RepoResult<Vec<u8>> {
        to_vec(result, "authentication result")
    }
}

fn to_vec<T: Serialize + ?Sized>(value: &T, what: &str) -> RepoResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| RepoError::Encode {
        what: what.to_string(),
        reason: e.to_string(),
    })
}
