//! Full-scan queries over an entity kind's index.
//!
//! The ledger has no secondary indexes, so every query reads the kind's ID
//! index and then one body per ID. Cost is linear in the number of
//! registered entities regardless of how selective the filter is. Scans
//! fail on the first unreadable or undecodable member; there is no
//! partial-result mode.

use serde::Serialize;
use tracing::debug;

use plv_types::{Entity, Image, ImageStatus};

use crate::codec::EntityCodec;
use crate::error::RepoResult;
use crate::repository::EntityRepository;

/// Number of images in each lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub demanded: usize,
    pub delivered: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.demanded + self.delivered
    }
}

/// Read-only scans backed by an [`EntityRepository`].
#[derive(Debug, Clone, Copy)]
pub struct QueryService<'a> {
    repo: &'a EntityRepository,
}

impl<'a> QueryService<'a> {
    pub fn new(repo: &'a EntityRepository) -> Self {
        Self { repo }
    }

    /// Every entity of kind `E`, in index insertion order.
    pub fn list_all<E: Entity>(&self) -> RepoResult<Vec<E>> {
        self.list_where(|_: &E| true)
    }

    /// Entities of kind `E` for which `keep` returns `true`, in index order.
    pub fn list_where<E, F>(&self, mut keep: F) -> RepoResult<Vec<E>>
    where
        E: Entity,
        F: FnMut(&E) -> bool,
    {
        let ids = self.repo.indexes().get_index(E::KIND)?;
        let scanned = ids.len();
        let mut matched = Vec::new();
        for id in ids {
            let bytes = self.repo.fetch_by_id(&id)?;
            let mut entity: E = EntityCodec::decode(&bytes)?;
            entity.adopt_key(&id);
            if keep(&entity) {
                matched.push(entity);
            }
        }
        debug!(kind = %E::KIND, scanned, matched = matched.len(), "index scan");
        Ok(matched)
    }

    /// Images whose owning user is exactly `owner`.
    pub fn list_by_owner(&self, owner: &str) -> RepoResult<Vec<Image>> {
        self.list_where(|image: &Image| image.user == owner)
    }

    /// Count images per lifecycle state.
    pub fn count_by_status(&self) -> RepoResult<StatusCounts> {
        let mut counts = StatusCounts::default();
        self.list_where(|image: &Image| {
            match image.status {
                ImageStatus::Demanded => counts.demanded += 1,
                ImageStatus::Delivered => counts.delivered += 1,
            }
            false
        })?;
        Ok(counts)
    }
}
