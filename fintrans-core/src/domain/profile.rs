//! User profile domain model

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// Balance a freshly signed-in user starts with
pub const DEFAULT_STARTING_BALANCE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// The signed-in user.
///
/// The token is opaque and carries no authority; it exists so the profile
/// shape matches what a real client would keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
    pub token: String,
}

impl UserProfile {
    /// Create a profile for a new session
    pub fn sign_in(name: &str, starting_balance: Decimal) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Enter name"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            balance: starting_balance,
            token: STANDARD.encode(name),
        })
    }
}
