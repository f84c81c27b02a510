//! Whole-store export and import.
//!
//! A snapshot is a plain map from every live physical key (as a string) to
//! its decoded JSON value - readable with any JSON tooling, diffable, and
//! re-importable. [`TableStore::backup`] / [`TableStore::restore`] wrap the
//! map in a pretty-printed file.
//!
//! Expiry metadata is **not** carried across a snapshot: exported records
//! lose their ttl and come back permanent on import. Expired-but-present
//! records are not exported at all.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::engine::envelope;
use crate::error::{Error, Result};
use crate::store::TableStore;

impl TableStore {
    /// Exports every live entry (records and index entries alike) as a map
    /// from physical key to decoded value.
    pub fn export(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let now = envelope::now_ms();

        let rtx = self.engine().read_tx();
        let mut snapshot = BTreeMap::new();
        for item in rtx.iter(self.engine().entries()) {
            let (physical, entry) = item?;
            let (expires_at, payload) = envelope::decode(&entry)?;
            if envelope::is_expired(expires_at, now) {
                continue;
            }
            let key = String::from_utf8_lossy(&physical).into_owned();
            let value = serde_json::from_slice(payload).map_err(Error::Deserialization)?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// Re-applies every snapshot entry as a raw set, in one transaction.
    ///
    /// Existing entries under the same keys are overwritten; entries not in
    /// the snapshot are left alone. Imported entries carry no expiry.
    pub fn import(&self, snapshot: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        let mut tx = self.engine().write_tx();
        for (physical, value) in snapshot {
            let payload = serde_json::to_vec(value).map_err(Error::Serialization)?;
            tx.insert(
                self.engine().entries(),
                physical.as_bytes(),
                envelope::encode(&payload, None),
            );
        }
        self.engine().commit(tx)?;

        info!(entries = snapshot.len(), "snapshot imported");
        Ok(())
    }

    /// Writes [`TableStore::export`] to `path` as pretty-printed JSON.
    pub fn backup(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = self.export()?;
        let data = serde_json::to_vec_pretty(&snapshot).map_err(Error::Serialization)?;
        std::fs::write(&path, data)?;

        info!(
            path = %path.as_ref().display(),
            entries = snapshot.len(),
            "store backed up"
        );
        Ok(())
    }

    /// Reads a backup file written by [`TableStore::backup`] and imports it.
    pub fn restore(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = std::fs::read(&path)?;
        let snapshot: BTreeMap<String, serde_json::Value> =
            serde_json::from_slice(&data).map_err(Error::Deserialization)?;
        self.import(&snapshot)?;

        info!(path = %path.as_ref().display(), "store restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::store::testutil::temp_store;
    use std::time::Duration;

    #[test]
    fn test_export_import_round_trip() {
        let (source, _dir1) = temp_store();

        source.save("users", "u1", &"alice", None).unwrap();
        source.save("users", "u2", &"bob", None).unwrap();
        source.index("users", "admin", &["u1"]).unwrap();

        let snapshot = source.export().unwrap();
        assert_eq!(snapshot.len(), 3);

        let (target, _dir2) = temp_store();
        target.import(&snapshot).unwrap();

        assert_eq!(target.get::<String>("users", "u1").unwrap(), "alice");
        assert_eq!(target.get::<String>("users", "u2").unwrap(), "bob");
        assert_eq!(target.query_index("users", "admin").unwrap(), vec!["u1"]);

        // Bit-for-bit: exporting the target again yields the same document.
        assert_eq!(target.export().unwrap(), snapshot);
    }

    #[test]
    fn test_backup_restore_file_round_trip() {
        let (source, dir) = temp_store();

        source.save("cfg", "a", &42, None).unwrap();
        source.save("cfg", "b", &"text", None).unwrap();

        let path = dir.path().join("backup.json");
        source.backup(&path).unwrap();

        let (target, _dir2) = temp_store();
        target.restore(&path).unwrap();

        assert_eq!(target.get::<i32>("cfg", "a").unwrap(), 42);
        assert_eq!(target.get::<String>("cfg", "b").unwrap(), "text");
    }

    #[test]
    fn test_expired_records_are_not_exported() {
        let (store, _dir) = temp_store();

        store.save("t", "keep", &1, None).unwrap();
        store
            .save("t", "gone", &2, Some(Duration::from_millis(30)))
            .unwrap();

        std::thread::sleep(Duration::from_millis(60));

        let snapshot = store.export().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("t:keep"));
    }

    #[test]
    fn test_import_drops_ttl() {
        let (source, _dir1) = temp_store();

        source
            .save("t", "k", &1, Some(Duration::from_millis(200)))
            .unwrap();
        let snapshot = source.export().unwrap();

        let (target, _dir2) = temp_store();
        target.import(&snapshot).unwrap();

        std::thread::sleep(Duration::from_millis(250));

        // The original would have expired by now; the import did not carry
        // the ttl, so the restored record is permanent.
        assert_eq!(target.get::<i32>("t", "k").unwrap(), 1);
    }

    #[test]
    fn test_restore_missing_file_is_io_error() {
        let (store, dir) = temp_store();

        let err = store
            .restore(dir.path().join("does-not-exist.json"))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
