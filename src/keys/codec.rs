//! Key encoding and validation.
//!
//! Pure functions, no state. See the module docs in [`crate::keys`] for the
//! physical layout.

use crate::error::{Error, Result};

/// Separator between key components. Reserved: rejected inside components.
pub const SEPARATOR: char = ':';

/// Namespace prefix for index entries. The table name `index` is reserved so
/// record keys can never collide with index keys.
pub(crate) const INDEX_NAMESPACE: &str = "index";

/// Validates a key component: non-empty and separator-free.
fn validate_component(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid(format!("{what} must not be empty")));
    }
    if value.contains(SEPARATOR) {
        return Err(Error::invalid(format!(
            "{what} must not contain the reserved separator {SEPARATOR:?}"
        )));
    }
    Ok(())
}

/// Validates a table name: a regular component that is not the reserved
/// index namespace.
fn validate_table(table: &str) -> Result<()> {
    validate_component("table", table)?;
    if table == INDEX_NAMESPACE {
        return Err(Error::invalid(format!(
            "table name {INDEX_NAMESPACE:?} is reserved"
        )));
    }
    Ok(())
}

/// Encodes the physical key for a record.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `table` or `key` is empty, contains
/// the separator, or `table` is the reserved name `index`.
pub fn record_key(table: &str, key: &str) -> Result<Vec<u8>> {
    validate_table(table)?;
    validate_component("key", key)?;
    Ok(format!("{table}{SEPARATOR}{key}").into_bytes())
}

/// Encodes the physical key for an index entry.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] under the same rules as
/// [`record_key`], applied to `table` and `index_key`.
pub fn index_key(table: &str, index_key: &str) -> Result<Vec<u8>> {
    validate_table(table)?;
    validate_component("index key", index_key)?;
    Ok(format!("{INDEX_NAMESPACE}{SEPARATOR}{table}{SEPARATOR}{index_key}").into_bytes())
}

/// Encodes the byte prefix shared by every record of `table`.
pub fn table_prefix(table: &str) -> Result<Vec<u8>> {
    validate_table(table)?;
    Ok(format!("{table}{SEPARATOR}").into_bytes())
}

/// Encodes the seek prefix for a prefix scan over `table`.
///
/// An empty `prefix` is allowed and scans the whole table.
pub fn scan_prefix(table: &str, prefix: &str) -> Result<Vec<u8>> {
    validate_table(table)?;
    if prefix.contains(SEPARATOR) {
        return Err(Error::invalid(format!(
            "prefix must not contain the reserved separator {SEPARATOR:?}"
        )));
    }
    Ok(format!("{table}{SEPARATOR}{prefix}").into_bytes())
}

/// Splits a physical record key back into (table, key).
///
/// Returns `None` for keys that are not valid UTF-8 or carry no separator.
/// Index entries split as (`"index"`, rest), which callers filter by table
/// name when they only want records.
pub fn split_record_key(physical: &[u8]) -> Option<(&str, &str)> {
    let text = std::str::from_utf8(physical).ok()?;
    text.split_once(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_layout() {
        assert_eq!(record_key("users", "u1").unwrap(), b"users:u1");
        assert_eq!(index_key("users", "admin").unwrap(), b"index:users:admin");
        assert_eq!(table_prefix("users").unwrap(), b"users:");
        assert_eq!(scan_prefix("users", "u").unwrap(), b"users:u");
        assert_eq!(scan_prefix("users", "").unwrap(), b"users:");
    }

    #[test]
    fn test_order_preserved_within_table() {
        // Physical keys must sort exactly like logical keys within one table.
        let keys = ["a", "ab", "b", "user1", "user2", "z"];
        let mut encoded: Vec<Vec<u8>> = keys
            .iter()
            .map(|k| record_key("t", k).unwrap())
            .collect();
        let sorted = encoded.clone();
        encoded.sort();
        assert_eq!(encoded, sorted);
    }

    #[test]
    fn test_tables_are_prefix_distinct() {
        // "user" and "users" are distinct tables; neither prefix may capture
        // the other's records.
        let prefix = table_prefix("user").unwrap();
        let other = record_key("users", "k").unwrap();
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn test_no_record_index_collision() {
        // A record in some table can never encode to an index entry address.
        let idx = index_key("users", "admin").unwrap();
        assert_eq!(idx, b"index:users:admin");
        // The only spellings that could alias it are both rejected.
        assert!(record_key("index", "users").is_err());
        assert!(record_key("index", "users:admin").is_err());
    }

    #[test]
    fn test_rejects_empty_components() {
        assert!(record_key("", "k").is_err());
        assert!(record_key("t", "").is_err());
        assert!(index_key("t", "").is_err());
        assert!(table_prefix("").is_err());
    }

    #[test]
    fn test_rejects_separator_in_components() {
        assert!(record_key("ta:ble", "k").is_err());
        assert!(record_key("t", "k:1").is_err());
        assert!(index_key("t", "a:b").is_err());
        assert!(scan_prefix("t", "a:").is_err());
    }

    #[test]
    fn test_rejects_reserved_table() {
        assert!(record_key("index", "k").is_err());
        assert!(table_prefix("index").is_err());
        // Only the exact name is reserved.
        assert!(record_key("indexes", "k").is_ok());
    }

    #[test]
    fn test_split_record_key() {
        let physical = record_key("users", "u1").unwrap();
        assert_eq!(split_record_key(&physical), Some(("users", "u1")));
        assert_eq!(split_record_key(b"no-separator"), None);
        assert_eq!(split_record_key(&[0xff, 0xfe]), None);
    }
}
