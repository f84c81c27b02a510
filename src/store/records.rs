//! Primary record operations: save, get, delete, and table utilities.
//!
//! Values cross this boundary as typed data and are stored as JSON bytes
//! inside the engine's expiry envelope. Each operation is one transaction.
//!
//! Saving a record never touches secondary indexes; index maintenance is a
//! separate, explicit operation (see [`crate::store::index`]).

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::engine::envelope;
use crate::error::{Error, Result};
use crate::keys::codec;
use crate::store::TableStore;

impl TableStore {
    /// Saves a record, overwriting any previous value under (table, key).
    ///
    /// With `ttl` present the record expires that long from now: reads then
    /// behave as if it were gone, and a sweep reclaims the space.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] on a malformed table or key, or a zero ttl
    /// - [`Error::Serialization`] if `value` cannot be encoded
    /// - [`Error::Storage`] if the transaction fails; not retried
    pub fn save<T: Serialize>(
        &self,
        table: &str,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let physical = codec::record_key(table, key)?;
        let expires_at = match ttl {
            None => None,
            Some(d) if d.is_zero() => {
                return Err(Error::invalid("ttl must be greater than zero"))
            }
            Some(d) => Some(envelope::deadline(d)),
        };
        let payload = serde_json::to_vec(value).map_err(Error::Serialization)?;

        let mut tx = self.engine().write_tx();
        tx.insert(
            self.engine().entries(),
            physical,
            envelope::encode(&payload, expires_at),
        );
        self.engine().commit(tx)?;

        info!(table, key, ttl_ms = ttl.map(|d| d.as_millis() as u64), "record saved");
        Ok(())
    }

    /// Fetches a record and decodes it into `T`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the record is absent or expired
    /// - [`Error::Deserialization`] if the stored bytes do not match `T`
    pub fn get<T: DeserializeOwned>(&self, table: &str, key: &str) -> Result<T> {
        let physical = codec::record_key(table, key)?;

        let rtx = self.engine().read_tx();
        let Some(entry) = rtx.get(self.engine().entries(), &physical)? else {
            return Err(Error::not_found(table, key));
        };

        let (expires_at, payload) = envelope::decode(&entry)?;
        if envelope::is_expired(expires_at, envelope::now_ms()) {
            // Physically present until a sweep runs, but logically gone.
            return Err(Error::not_found(table, key));
        }
        serde_json::from_slice(payload).map_err(Error::Deserialization)
    }

    /// Deletes a record. Deleting a key that does not exist is not an error.
    ///
    /// Index entries referring to the record are left in place; see the
    /// crate docs on index staleness.
    pub fn delete(&self, table: &str, key: &str) -> Result<()> {
        let physical = codec::record_key(table, key)?;

        let mut tx = self.engine().write_tx();
        tx.remove(self.engine().entries(), physical);
        self.engine().commit(tx)?;

        info!(table, key, "record deleted");
        Ok(())
    }

    /// Counts the live records in a table.
    pub fn count_records(&self, table: &str) -> Result<usize> {
        let prefix = codec::table_prefix(table)?;
        let now = envelope::now_ms();

        let rtx = self.engine().read_tx();
        let mut count = 0;
        for item in rtx.prefix(self.engine().entries(), &prefix) {
            let (_, value) = item?;
            let (expires_at, _) = envelope::decode(&value)?;
            if !envelope::is_expired(expires_at, now) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Lists the logical keys of every live record in a table, in key order.
    pub fn all_keys(&self, table: &str) -> Result<Vec<String>> {
        let prefix = codec::table_prefix(table)?;
        let now = envelope::now_ms();

        let rtx = self.engine().read_tx();
        let mut keys = Vec::new();
        for item in rtx.prefix(self.engine().entries(), &prefix) {
            let (physical, value) = item?;
            let (expires_at, _) = envelope::decode(&value)?;
            if envelope::is_expired(expires_at, now) {
                continue;
            }
            if let Some((_, key)) = codec::split_record_key(&physical) {
                keys.push(key.to_string());
            }
        }
        Ok(keys)
    }
}
