//! Profile store - the signed-in user, persisted under a single key

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::UserProfile;
use crate::ports::{is_valid_key, KeyValueStore};

use super::history_key;

/// Storage key holding the current profile
pub const PROFILE_KEY: &str = "fta_user";

/// Loads and saves the current user profile
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored profile. Missing or malformed data reads as signed out,
    /// as does a profile whose id cannot key a transaction log.
    pub fn load(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.store.get(PROFILE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) if is_valid_key(&history_key(&profile.id)) => Ok(Some(profile)),
            Ok(profile) => {
                tracing::warn!(id = %profile.id, "ignoring stored profile with unusable id");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed stored profile");
                Ok(None)
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        let raw = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &raw)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(PROFILE_KEY)
    }

    /// Start a new session. The PIN is accepted and not checked.
    pub fn sign_in(&self, name: &str, _pin: &str, starting_balance: Decimal) -> Result<UserProfile> {
        let profile = UserProfile::sign_in(name, starting_balance)?;
        self.save(&profile)?;
        Ok(profile)
    }

    /// End the session. The user's transaction log is left in place.
    pub fn logout(&self) -> Result<()> {
        self.clear()
    }
}
