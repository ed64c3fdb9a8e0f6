//! Transaction log store - one ordered record list per user

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::TransactionRecord;
use crate::ports::KeyValueStore;

/// Storage key for a user's transaction log
pub fn history_key(user_id: &str) -> String {
    format!("fta_history_{}", user_id)
}

/// Loads and saves transaction logs, newest record first
#[derive(Clone)]
pub struct TransactionLogStore {
    store: Arc<dyn KeyValueStore>,
}

impl TransactionLogStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The user's log. Missing or malformed data reads as empty, as does a
    /// user id the store cannot use as a key.
    pub fn load(&self, user_id: &str) -> Result<Vec<TransactionRecord>> {
        let raw = match self.store.get(&history_key(user_id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(Error::Storage(e)) => {
                tracing::warn!(error = %e, "ignoring unreadable transaction log");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed stored transaction log");
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&self, user_id: &str, records: &[TransactionRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(&history_key(user_id), &raw)
    }
}
