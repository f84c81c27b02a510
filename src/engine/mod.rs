//! Storage Engine Adapter
//!
//! This module is the boundary to the embedded engine. Everything above it
//! (records, indexes, queries, sweeps, batches) talks in terms of
//! transactions, ordered iteration, and expiry-aware entries; everything
//! below it is [`fjall`], an LSM keyspace with snapshot-isolated read
//! transactions and serialized single-writer write transactions.
//!
//! ## Entry format
//!
//! fjall has no native per-entry TTL, so the adapter owns it: every stored
//! value is wrapped in a small envelope,
//!
//! ```text
//! [ 8-byte BE expiry, milliseconds since epoch; 0 = never ][ payload ]
//! ```
//!
//! and every read path decodes the envelope and treats an expired entry as
//! absent. The physical bytes stay on disk until a sweep removes them; the
//! envelope is what makes the expired-but-present state invisible to
//! readers.
//!
//! ## Transactions
//!
//! One public store operation maps to exactly one transaction. Write
//! transactions either pass through [`LsmEngine::commit`] (which applies the
//! durability knob) or are dropped, which rolls them back - there is no exit
//! path that leaves a transaction half-applied.

pub mod envelope;
pub mod lsm;

// Re-export commonly used types
pub use lsm::{EngineConfig, LsmEngine};
