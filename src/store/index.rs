//! Secondary index maintenance and lookup.
//!
//! An index entry maps (table, indexKey) to the list of record keys callers
//! have filed under that value - e.g. `("users", "admin") -> ["u1", "u7"]`.
//! The list keeps insertion order and whatever duplicates the caller passes;
//! the store does not dedupe.
//!
//! Indexes live **outside** the record write path. Saving or deleting a
//! record never updates an index, so an entry can hold keys whose records
//! are gone. Callers own the index lifecycle: resolve-and-skip-missing at
//! query time (see [`crate::Error::is_not_found`]), re-index, or
//! [`TableStore::remove_index`] explicitly.

use tracing::debug;

use crate::engine::envelope;
use crate::error::{Error, Result};
use crate::keys::codec;
use crate::store::TableStore;

impl TableStore {
    /// Appends record keys to the index entry for (table, index_key),
    /// creating it if needed.
    ///
    /// The read and the write-back happen inside one write transaction, and
    /// the engine serializes write transactions, so two concurrent `index`
    /// calls on the same entry cannot lose each other's appends. (An engine
    /// with snapshot isolation but no write-write detection would race
    /// here.)
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] on a malformed table or index key
    /// - [`Error::Deserialization`] if the stored entry is corrupt
    /// - [`Error::Storage`] if the transaction fails
    pub fn index<S: AsRef<str>>(
        &self,
        table: &str,
        index_key: &str,
        record_keys: &[S],
    ) -> Result<()> {
        let physical = codec::index_key(table, index_key)?;

        let mut tx = self.engine().write_tx();
        let mut keys: Vec<String> = match tx.get(self.engine().entries(), &physical)? {
            Some(entry) => {
                let (_, payload) = envelope::decode(&entry)?;
                serde_json::from_slice(payload).map_err(Error::Deserialization)?
            }
            None => Vec::new(),
        };
        keys.extend(record_keys.iter().map(|k| k.as_ref().to_string()));

        let payload = serde_json::to_vec(&keys).map_err(Error::Serialization)?;
        tx.insert(
            self.engine().entries(),
            physical,
            envelope::encode(&payload, None),
        );
        self.engine().commit(tx)?;

        debug!(table, index_key, total = keys.len(), "index entry updated");
        Ok(())
    }

    /// Returns the record keys filed under (table, index_key), in insertion
    /// order.
    ///
    /// The keys are whatever was indexed - some may point at records that
    /// have since been deleted or expired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no index entry exists for that key.
    pub fn query_index(&self, table: &str, index_key: &str) -> Result<Vec<String>> {
        let physical = codec::index_key(table, index_key)?;

        let rtx = self.engine().read_tx();
        let Some(entry) = rtx.get(self.engine().entries(), &physical)? else {
            return Err(Error::not_found(table, index_key));
        };
        let (_, payload) = envelope::decode(&entry)?;
        serde_json::from_slice(payload).map_err(Error::Deserialization)
    }

    /// Drops the whole index entry for (table, index_key). Removing an entry
    /// that does not exist is not an error.
    pub fn remove_index(&self, table: &str, index_key: &str) -> Result<()> {
        let physical = codec::index_key(table, index_key)?;

        let mut tx = self.engine().write_tx();
        tx.remove(self.engine().entries(), physical);
        self.engine().commit(tx)?;

        debug!(table, index_key, "index entry removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::store::testutil::temp_store;

    #[test]
    fn test_index_appends_in_call_order() {
        let (store, _dir) = temp_store();

        store.index("users", "admin", &["u1"]).unwrap();
        store.index("users", "admin", &["u2"]).unwrap();

        let keys = store.query_index("users", "admin").unwrap();
        assert_eq!(keys, vec!["u1", "u2"]);
    }

    #[test]
    fn test_multi_value_index() {
        let (store, _dir) = temp_store();

        store.index("users", "role", &["u1", "u2", "u3"]).unwrap();
        let keys = store.query_index("users", "role").unwrap();
        assert_eq!(keys, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let (store, _dir) = temp_store();

        store.index("users", "admin", &["u1"]).unwrap();
        store.index("users", "admin", &["u1"]).unwrap();

        let keys = store.query_index("users", "admin").unwrap();
        assert_eq!(keys, vec!["u1", "u1"]);
    }

    #[test]
    fn test_one_record_under_many_index_keys() {
        let (store, _dir) = temp_store();

        // Composite indexing is the caller filing the same record under
        // several index keys.
        store.index("users", "alice@example.com", &["u1"]).unwrap();
        store.index("users", "admin", &["u1"]).unwrap();

        assert_eq!(
            store.query_index("users", "alice@example.com").unwrap(),
            vec!["u1"]
        );
        assert_eq!(store.query_index("users", "admin").unwrap(), vec!["u1"]);
    }

    #[test]
    fn test_missing_index_is_not_found() {
        let (store, _dir) = temp_store();

        let err = store.query_index("users", "ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_index_survives_record_delete() {
        let (store, _dir) = temp_store();

        store.save("users", "u1", &"alice", None).unwrap();
        store.index("users", "admin", &["u1"]).unwrap();
        store.delete("users", "u1").unwrap();

        // No cascade: the index still lists the deleted record's key.
        let keys = store.query_index("users", "admin").unwrap();
        assert_eq!(keys, vec!["u1"]);
        assert!(store.get::<String>("users", "u1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_index() {
        let (store, _dir) = temp_store();

        store.index("users", "admin", &["u1"]).unwrap();
        store.remove_index("users", "admin").unwrap();

        assert!(store.query_index("users", "admin").unwrap_err().is_not_found());

        // Idempotent.
        store.remove_index("users", "admin").unwrap();
    }

    #[test]
    fn test_index_does_not_collide_with_records() {
        let (store, _dir) = temp_store();

        store.save("users", "admin", &"a record", None).unwrap();
        store.index("users", "admin", &["u1"]).unwrap();

        // Same (table, name), different namespaces.
        let record: String = store.get("users", "admin").unwrap();
        assert_eq!(record, "a record");
        assert_eq!(store.query_index("users", "admin").unwrap(), vec!["u1"]);
    }
}
