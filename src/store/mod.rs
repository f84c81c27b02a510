//! Table Store
//!
//! [`TableStore`] is the public handle of the crate: a table-oriented view
//! over the flat key space of the embedded engine. Its surface is split by
//! concern, one file per group of operations:
//!
//! - [`records`]: save / get / delete plus table utilities
//! - [`index`]: secondary index maintenance and lookup
//! - [`query`]: prefix, range, and paginated scans
//! - [`expiry`]: expiry sweeps and the background sweeper task
//! - [`batch`]: atomic multi-record mutations
//! - [`snapshot`]: whole-store export / import
//!
//! ## Transactions
//!
//! Every public operation opens exactly one engine transaction and commits
//! it (or drops it, which rolls back). There is no cross-call atomicity:
//! callers that need several mutations to land together use the batch
//! operations.
//!
//! ## Example
//!
//! ```ignore
//! use tablekv::TableStore;
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct User { name: String, email: String }
//!
//! let store = TableStore::open("data")?;
//!
//! let alice = User { name: "Alice".into(), email: "alice@example.com".into() };
//! store.save("users", "u1", &alice, Some(Duration::from_secs(3600)))?;
//! store.index("users", &alice.email, &["u1"])?;
//!
//! let found: User = store.get("users", "u1")?;
//! # Ok::<(), tablekv::Error>(())
//! ```

pub mod batch;
pub mod expiry;
pub mod index;
pub mod query;
pub mod records;
pub mod snapshot;

// Re-export commonly used types
pub use expiry::{start_expiry_sweeper, ExpirySweeper, SweeperConfig};

use crate::engine::{EngineConfig, LsmEngine};
use crate::error::Result;

/// A table-oriented store over the embedded engine.
///
/// Thread-safe: wrap it in an `Arc` and call it from as many threads or
/// tasks as needed. Readers see consistent snapshots; writers are serialized
/// by the engine.
#[derive(Debug)]
pub struct TableStore {
    engine: LsmEngine,
}

impl TableStore {
    /// Opens (or creates) a store at `path` with default engine settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Storage`] if the engine cannot be opened.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::open_with_config(EngineConfig::new(path))
    }

    /// Opens (or creates) a store with explicit engine settings.
    pub fn open_with_config(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            engine: LsmEngine::open(config)?,
        })
    }

    /// The underlying engine handle.
    pub fn engine(&self) -> &LsmEngine {
        &self.engine
    }

    /// Flushes the engine journal to disk.
    ///
    /// Useful before process exit when the store was opened without
    /// `sync_writes`.
    pub fn persist(&self) -> Result<()> {
        self.engine.persist()
    }

    /// Reclaims stale value-log space; see [`LsmEngine::reclaim_space`].
    pub fn reclaim_space(&self, staleness: f32) -> Result<u64> {
        self.engine.reclaim_space(staleness)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::TableStore;
    use crate::engine::EngineConfig;

    /// Opens a store on a fresh temp directory. The directory guard must be
    /// kept alive for the duration of the test.
    pub fn temp_store() -> (TableStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::open_with_config(EngineConfig::new(dir.path())).unwrap();
        (store, dir)
    }
}
