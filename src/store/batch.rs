//! Atomic multi-record mutations.
//!
//! Each batch call opens one write transaction and applies every item's
//! mutation inside it. If any item fails - key validation, serialization,
//! or the commit itself - the transaction is dropped and rolled back, so a
//! partially applied batch is never observable.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::engine::envelope;
use crate::error::{Error, Result};
use crate::keys::codec;
use crate::store::TableStore;

impl TableStore {
    /// Inserts every (key, value) pair in one atomic transaction, all with
    /// the same optional ttl.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole batch; the store is left unchanged.
    pub fn batch_insert<K: AsRef<str>, T: Serialize>(
        &self,
        table: &str,
        items: &[(K, T)],
        ttl: Option<Duration>,
    ) -> Result<()> {
        let expires_at = match ttl {
            None => None,
            Some(d) if d.is_zero() => {
                return Err(Error::invalid("ttl must be greater than zero"))
            }
            Some(d) => Some(envelope::deadline(d)),
        };

        let mut tx = self.engine().write_tx();
        for (key, value) in items {
            let physical = codec::record_key(table, key.as_ref())?;
            let payload = serde_json::to_vec(value).map_err(Error::Serialization)?;
            tx.insert(
                self.engine().entries(),
                physical,
                envelope::encode(&payload, expires_at),
            );
        }
        self.engine().commit(tx)?;

        info!(table, count = items.len(), "batch insert committed");
        Ok(())
    }

    /// Replaces every (key, value) pair in one atomic transaction.
    ///
    /// Updated records carry no expiry afterwards, even if the previous
    /// version had one.
    pub fn batch_update<K: AsRef<str>, T: Serialize>(
        &self,
        table: &str,
        items: &[(K, T)],
    ) -> Result<()> {
        let mut tx = self.engine().write_tx();
        for (key, value) in items {
            let physical = codec::record_key(table, key.as_ref())?;
            let payload = serde_json::to_vec(value).map_err(Error::Serialization)?;
            tx.insert(
                self.engine().entries(),
                physical,
                envelope::encode(&payload, None),
            );
        }
        self.engine().commit(tx)?;

        info!(table, count = items.len(), "batch update committed");
        Ok(())
    }

    /// Deletes every key in one atomic transaction. Keys that do not exist
    /// are skipped silently.
    pub fn batch_delete<K: AsRef<str>>(&self, table: &str, keys: &[K]) -> Result<()> {
        let mut tx = self.engine().write_tx();
        for key in keys {
            let physical = codec::record_key(table, key.as_ref())?;
            tx.remove(self.engine().entries(), physical);
        }
        self.engine().commit(tx)?;

        info!(table, count = keys.len(), "batch delete committed");
        Ok(())
    }
}
