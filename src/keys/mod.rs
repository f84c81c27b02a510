//! Physical Key Codec
//!
//! This module maps logical (table, key) pairs onto the engine's flat byte
//! key space. The whole table abstraction rests on two properties of the
//! encoding:
//!
//! 1. **Injectivity**: no two distinct (table, key) pairs may produce the
//!    same physical key, and no table's encoded prefix may shadow another
//!    table's keys.
//! 2. **Order preservation**: within a fixed table, physical keys sort in
//!    byte-lexicographic order of the logical key, so the engine's ordered
//!    iterator yields range and prefix scans directly.
//!
//! ## Layout
//!
//! ```text
//! record:       <table> ':' <key>
//! index entry:  "index" ':' <table> ':' <indexKey>
//! ```
//!
//! The separator byte `':'` is reserved - it is rejected inside table, key,
//! and index-key components. The table name `index` is reserved as well, so a
//! user table can never alias the index namespace.

pub mod codec;

pub use codec::{
    index_key, record_key, scan_prefix, split_record_key, table_prefix, SEPARATOR,
};
