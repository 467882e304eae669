//! The [`EntityRepository`]: typed store/fetch of entities by ID.

use std::sync::Arc;

use tracing::{debug, info, warn};

use plv_index::IndexManager;
use plv_store::Ledger;
use plv_types::{Entity, EntityKind, User, UserLookup};

use crate::codec::EntityCodec;
use crate::error::{RepoError, RepoResult};

/// Stores entity bodies under their IDs, keeping the per-kind index in step.
///
/// Index first, body second: a failed index insertion (duplicate, storage
/// error) means the body is never written. The reverse gap remains: if the
/// index write lands and the body write fails, the ID stays registered with
/// no body behind it. That failure is reported, not repaired, and a later
/// full scan will fail on the missing body.
pub struct EntityRepository {
    ledger: Arc<dyn Ledger>,
    indexes: IndexManager,
}

impl std::fmt::Debug for EntityRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRepository")
            .field("indexes", &self.indexes)
            .finish()
    }
}

impl EntityRepository {
    /// Create a repository over `ledger`. `indexes` must manage the same
    /// ledger.
    pub fn new(ledger: Arc<dyn Ledger>, indexes: IndexManager) -> Self {
        Self { ledger, indexes }
    }

    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    // ---- Writes ----

    /// Register `id` in `kind`'s index, then write `body` under `id`.
    ///
    /// Uniqueness is per kind only. Bodies of all kinds share the ledger's
    /// single key namespace, so a user and an image registered under the
    /// same ID overwrite each other's body.
    pub fn store(&self, kind: EntityKind, id: &str, body: &[u8]) -> RepoResult<()> {
        let id = self.indexes.add_id(kind, id)?;
        self.ledger.put(&id, body).map_err(|source| {
            warn!(%kind, id = %id, "ID registered but body write failed");
            RepoError::StorageWrite {
                key: id.clone(),
                source,
            }
        })?;
        info!(%kind, id = %id, bytes = body.len(), "stored entity");
        Ok(())
    }

    /// Encode `entity` and [`store`](Self::store) it under its own ID.
    pub fn store_entity<E: Entity>(&self, entity: &E) -> RepoResult<()> {
        let body = EntityCodec::encode(entity)?;
        self.store(E::KIND, entity.id(), &body)
    }

    /// Rewrite the body of an already stored entity without touching the
    /// index. The caller is expected to have fetched it first.
    pub fn overwrite_entity<E: Entity>(&self, entity: &E) -> RepoResult<()> {
        let body = EntityCodec::encode(entity)?;
        let id = entity.id();
        self.ledger
            .put(id, &body)
            .map_err(|source| RepoError::StorageWrite {
                key: id.to_string(),
                source,
            })?;
        debug!(kind = %E::KIND, id, "overwrote entity");
        Ok(())
    }

    /// Overwrite `kind`'s index with the empty sequence.
    ///
    /// Bootstrap only. Bodies of the previously indexed IDs are left in the
    /// ledger, unreachable.
    pub fn reset_index(&self, kind: EntityKind) -> RepoResult<()> {
        self.indexes.reset(kind)?;
        Ok(())
    }

    // ---- Reads ----

    /// Raw body stored under `id`.
    pub fn fetch_by_id(&self, id: &str) -> RepoResult<Vec<u8>> {
        self.ledger
            .get(id)
            .map_err(|source| RepoError::StorageRead {
                key: id.to_string(),
                source,
            })?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    /// Fetch and decode the entity stored under `id`.
    pub fn fetch_entity<E: Entity>(&self, id: &str) -> RepoResult<E> {
        let bytes = self.fetch_by_id(id)?;
        EntityCodec::decode(&bytes)
    }

    /// Resolve `username` for authentication.
    ///
    /// Only IDs registered in the user index resolve; any other key,
    /// including the ID of a stored image, is [`UserLookup::NotFound`].
    /// Read and decode failures are [`UserLookup::Failed`]. A stored record
    /// with every attribute empty resolves to the empty [`User`] and does
    /// not take the username from the key.
    pub fn lookup_user(&self, username: &str) -> UserLookup {
        match self.indexes.id_exists(EntityKind::User, username) {
            Ok(true) => {}
            Ok(false) => {
                debug!(username, "user not registered");
                return UserLookup::NotFound;
            }
            Err(e) => {
                warn!(username, error = %e, "user index lookup failed");
                return UserLookup::Failed(e.to_string());
            }
        }

        match self.fetch_entity::<User>(username) {
            Ok(user) if user.is_empty() => {
                debug!(username, "stored user record is empty");
                UserLookup::Found(user)
            }
            Ok(mut user) => {
                user.adopt_key(username);
                UserLookup::Found(user)
            }
            Err(RepoError::NotFound(_)) => {
                debug!(username, "user body missing");
                UserLookup::NotFound
            }
            Err(e) => {
                warn!(username, error = %e, "user lookup failed");
                UserLookup::Failed(e.to_string())
            }
        }
    }
}
