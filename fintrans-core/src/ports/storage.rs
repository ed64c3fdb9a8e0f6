//! Key-value storage port - the persisted session store

use crate::domain::result::Result;

/// Whether `key` can be stored: non-empty ASCII letters, digits, `_` and `-`
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// String-keyed storage of serialized values.
///
/// Mirrors the shape of browser `localStorage`: whole values are read and
/// replaced, there are no partial updates and no transactions.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written or was removed.
    ///
    /// Bytes that are not valid UTF-8 come back lossily decoded.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
