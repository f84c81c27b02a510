//! Prefix, range, and paginated scans over a table's key space.
//!
//! All three ride the engine's ordered iterator, so results come back in
//! table-scoped lexicographic key order. Expired-but-present entries are
//! skipped everywhere. An empty result is success, never an error.
//!
//! Pagination walks the table from the beginning and discards
//! `page * page_size` entries before collecting - O(page * page_size) per
//! call. Callers that need efficient deep pagination should keep the last
//! key of a page and issue a range query from there instead.

use serde::de::DeserializeOwned;

use crate::engine::envelope;
use crate::error::{Error, Result};
use crate::keys::codec;
use crate::store::TableStore;

impl TableStore {
    /// Returns the values of every live record whose key starts with
    /// `prefix`, in key order. An empty prefix scans the whole table.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] on a malformed table or prefix
    /// - [`Error::Deserialization`] if a stored value does not match `T`
    pub fn query_by_prefix<T: DeserializeOwned>(
        &self,
        table: &str,
        prefix: &str,
    ) -> Result<Vec<T>> {
        let scan = codec::scan_prefix(table, prefix)?;
        let now = envelope::now_ms();

        let rtx = self.engine().read_tx();
        let mut values = Vec::new();
        for item in rtx.prefix(self.engine().entries(), &scan) {
            let (_, entry) = item?;
            let (expires_at, payload) = envelope::decode(&entry)?;
            if envelope::is_expired(expires_at, now) {
                continue;
            }
            values.push(serde_json::from_slice(payload).map_err(Error::Deserialization)?);
        }
        Ok(values)
    }

    /// Returns the logical keys of every live record with
    /// `start_key <= key <= end_key`, in key order. Both bounds inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `start_key` sorts after
    /// `end_key` - an inverted range is a caller bug, not an empty result.
    pub fn query_range(
        &self,
        table: &str,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<String>> {
        if start_key > end_key {
            return Err(Error::invalid(format!(
                "range start {start_key:?} sorts after end {end_key:?}"
            )));
        }
        let start = codec::record_key(table, start_key)?;
        let end = codec::record_key(table, end_key)?;
        let now = envelope::now_ms();

        let rtx = self.engine().read_tx();
        let mut keys = Vec::new();
        for item in rtx.range(self.engine().entries(), start..=end) {
            let (physical, entry) = item?;
            let (expires_at, _) = envelope::decode(&entry)?;
            if envelope::is_expired(expires_at, now) {
                continue;
            }
            if let Some((_, key)) = codec::split_record_key(&physical) {
                keys.push(key.to_string());
            }
        }
        Ok(keys)
    }

    /// Returns one page of values from the table, skipping
    /// `page * page_size` live records and collecting up to `page_size`.
    /// Pages are 0-indexed.
    ///
    /// Asking for a page past the end returns an empty vec.
    pub fn query_paginated<T: DeserializeOwned>(
        &self,
        table: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<T>> {
        let prefix = codec::table_prefix(table)?;
        let skip = page.checked_mul(page_size).ok_or_else(|| {
            Error::invalid(format!("page window {page}x{page_size} overflows"))
        })?;
        let now = envelope::now_ms();

        let rtx = self.engine().read_tx();
        let mut seen = 0usize;
        let mut values = Vec::new();
        for item in rtx.prefix(self.engine().entries(), &prefix) {
            let (_, entry) = item?;
            let (expires_at, payload) = envelope::decode(&entry)?;
            if envelope::is_expired(expires_at, now) {
                continue;
            }
            if seen < skip {
                seen += 1;
                continue;
            }
            if values.len() == page_size {
                break;
            }
            values.push(serde_json::from_slice(payload).map_err(Error::Deserialization)?);
        }
        Ok(values)
    }
}
