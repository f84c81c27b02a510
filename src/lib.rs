//! # tablekv - A Table-Oriented Layer Over an Embedded LSM Engine
//!
//! tablekv gives application code a table-like programming model - named
//! tables, string keys, typed values, secondary indexes, range and prefix
//! queries, TTL-aware expiry, and atomic batches - on top of an embedded,
//! ordered, transactional key-value engine ([`fjall`]). Callers never touch
//! raw key encoding or transaction mechanics.
//!
//! ## Features
//!
//! - **Tables without schemas**: any `serde`-serializable value, stored as
//!   JSON bytes under `table:key`
//! - **Secondary indexes**: explicit, multi-value, insertion-ordered
//! - **Ordered queries**: prefix scans, inclusive range scans, pagination
//! - **TTL**: per-record expiry enforced on read, reclaimed by sweeps
//! - **Atomic batches**: insert/update/delete many records in one
//!   transaction
//! - **Snapshots**: whole-store export/import as a JSON document
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         TableStore                            │
//! │                                                               │
//! │  records    index     query     expiry    batch    snapshot   │
//! │  save/get   append/   prefix/   sweep/    insert/  export/    │
//! │  /delete    lookup    range/    near-exp  update/  import     │
//! │                       paginate            delete              │
//! │      │         │         │         │         │        │       │
//! │      └─────────┴────┬────┴─────────┴─────────┴────────┘       │
//! │                     ▼                                         │
//! │            ┌─────────────────┐     ┌────────────────────┐     │
//! │            │    Key Codec    │     │     LsmEngine      │     │
//! │            │  table:key ───► │ ──► │  (fjall keyspace,  │     │
//! │            │  physical bytes │     │   one partition)   │     │
//! │            └─────────────────┘     └────────────────────┘     │
//! │                                              ▲                │
//! │                            ┌─────────────────┘                │
//! │                            │     ExpirySweeper                │
//! │                            │  (background tokio task)         │
//! │                            └──────────────────                │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every public operation opens exactly one engine transaction; reads are
//! snapshot-isolated, writes are serialized by the engine's single-writer
//! lock. The sweeper is an explicit, caller-owned background task.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tablekv::{start_expiry_sweeper, TableStore};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct User { name: String, email: String, role: String }
//!
//! #[tokio::main]
//! async fn main() -> tablekv::Result<()> {
//!     let store = Arc::new(TableStore::open("data")?);
//!
//!     // Reclaim expired records in the background.
//!     let _sweeper = start_expiry_sweeper(Arc::clone(&store));
//!
//!     let alice = User {
//!         name: "Alice".into(),
//!         email: "alice@example.com".into(),
//!         role: "admin".into(),
//!     };
//!     store.save("users", "u1", &alice, Some(Duration::from_secs(3600)))?;
//!     store.index("users", &alice.role, &["u1"])?;
//!
//!     let found: User = store.get("users", "u1")?;
//!     let admins = store.query_index("users", "admin")?;
//!     let everyone: Vec<User> = store.query_by_prefix("users", "")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`keys`]: physical key codec (table namespacing, index namespace)
//! - [`engine`]: fjall adapter - transactions, expiry envelope, space
//!   reclamation
//! - [`store`]: the [`TableStore`] surface, one file per concern
//! - [`error`]: the crate-wide error taxonomy
//!
//! ## Known Limitations
//!
//! These are deliberate trade-offs, not bugs; they are worth reading before
//! building on the crate.
//!
//! - **Indexes can go stale.** Saving or deleting a record never updates an
//!   index. An index entry keeps listing a record key after the record is
//!   deleted or expired, until the caller re-indexes or calls
//!   [`TableStore::remove_index`]. Resolve index hits with
//!   [`TableStore::get`] and skip [`Error::NotFound`] results.
//! - **Pagination is a scan.** [`TableStore::query_paginated`] walks and
//!   discards `page * page_size` entries; deep pages cost proportionally.
//!   Use a key cursor with [`TableStore::query_range`] for deep pagination.
//! - **Snapshots drop TTLs.** Export carries values, not expiry metadata;
//!   imported records are permanent.
//! - **One transaction per call.** There is no cross-call atomicity; batch
//!   operations are the only multi-record transactions.

pub mod engine;
pub mod error;
pub mod keys;
pub mod store;

// Re-export commonly used types for convenience
pub use engine::{EngineConfig, LsmEngine};
pub use error::{Error, Result};
pub use store::{start_expiry_sweeper, ExpirySweeper, SweeperConfig, TableStore};

use std::time::Duration;

/// Default directory the CLI opens when `--path` is not given.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default interval between background expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Version of tablekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
