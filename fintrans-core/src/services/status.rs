//! Wallet status summary

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{TransactionRecord, TransactionStatus, UserProfile};

#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    pub user_id: String,
    pub name: String,
    pub balance: Decimal,
    pub busy: bool,
    pub total_transactions: usize,
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
}

impl WalletSummary {
    pub fn new(profile: &UserProfile, history: &[TransactionRecord], busy: bool) -> Self {
        let count = |status: TransactionStatus| history.iter().filter(|r| r.status == status).count();

        Self {
            user_id: profile.id.clone(),
            name: profile.name.clone(),
            balance: profile.balance,
            busy,
            total_transactions: history.len(),
            pending: count(TransactionStatus::Pending),
            completed: count(TransactionStatus::Completed),
            failed: count(TransactionStatus::Failed),
        }
    }
}
