//! Creation of the per-kind ID indexes.
//!
//! Resetting an index orphans every body it referenced, so bootstrap is an
//! explicit operation with two modes. [`BootstrapMode::Fresh`] only creates
//! what is missing and refuses to run over registered IDs;
//! [`BootstrapMode::Wipe`] unconditionally empties every index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use plv_index::IndexError;
use plv_repo::EntityRepository;
use plv_types::EntityKind;

use crate::error::{PlvError, PlvResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapMode {
    /// Write empty indexes where none exist; fail if any index holds IDs.
    #[default]
    Fresh,
    /// Reset every index to empty regardless of its contents.
    Wipe,
}

impl fmt::Display for BootstrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => f.write_str("fresh"),
            Self::Wipe => f.write_str("wipe"),
        }
    }
}

impl FromStr for BootstrapMode {
    type Err = PlvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fresh" => Ok(Self::Fresh),
            "wipe" => Ok(Self::Wipe),
            other => Err(PlvError::Argument(format!(
                "unknown bootstrap mode {other:?} (expected \"fresh\" or \"wipe\")"
            ))),
        }
    }
}

/// What a bootstrap run did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Kinds whose index was written empty.
    pub reset: Vec<EntityKind>,
    /// Kinds whose existing, empty index was left as is.
    pub kept: Vec<EntityKind>,
    /// IDs that became unreachable (wipe only).
    pub orphaned: usize,
}

pub(crate) fn run(repo: &EntityRepository, mode: BootstrapMode) -> PlvResult<BootstrapReport> {
    let indexes = repo.indexes();
    let mut report = BootstrapReport::default();

    match mode {
        BootstrapMode::Fresh => {
            // Inspect everything before writing anything.
            let mut missing = Vec::new();
            for kind in EntityKind::ALL {
                if !indexes.is_initialized(kind)? {
                    missing.push(kind);
                    continue;
                }
                let count = indexes.get_index(kind)?.len();
                if count > 0 {
                    warn!(%kind, count, "bootstrap refused over live data");
                    return Err(PlvError::LiveData { kind, count });
                }
                report.kept.push(kind);
            }
            for kind in missing {
                repo.reset_index(kind)?;
                report.reset.push(kind);
            }
        }
        BootstrapMode::Wipe => {
            // Count before writing: a read failure aborts with nothing reset.
            let mut orphans = Vec::with_capacity(EntityKind::ALL.len());
            for kind in EntityKind::ALL {
                let orphaned = match indexes.get_index(kind) {
                    Ok(ids) => ids.len(),
                    Err(IndexError::Uninitialized { .. }) => 0,
                    Err(IndexError::Decode { key, reason }) => {
                        warn!(%kind, key = %key, reason = %reason, "wiping undecodable index");
                        0
                    }
                    Err(e) => return Err(e.into()),
                };
                orphans.push((kind, orphaned));
            }
            for (kind, orphaned) in orphans {
                repo.reset_index(kind)?;
                if orphaned > 0 {
                    warn!(%kind, orphaned, "wiped index; bodies left unreachable");
                }
                report.orphaned += orphaned;
                report.reset.push(kind);
            }
        }
    }

    info!(%mode, reset = report.reset.len(), kept = report.kept.len(), "bootstrap complete");
    Ok(report)
}
