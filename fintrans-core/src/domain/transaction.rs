//! Transaction record domain model

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// Which way the money moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

/// Lifecycle of a record: created pending, resolved exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }

    /// Completed and failed are terminal
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transfer in a user's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub direction: Direction,
    /// Recipient for sent records, sender for received ones
    pub counterparty: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl TransactionRecord {
    /// A new pending outgoing transfer stamped now
    pub fn outgoing(counterparty: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            direction: Direction::Sent,
            counterparty: counterparty.into(),
            amount,
            timestamp: Utc::now(),
            status: TransactionStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Move a pending record to its terminal status.
    ///
    /// Fails if the record was already resolved or if `status` is not terminal.
    pub fn resolve(&mut self, status: TransactionStatus) -> Result<()> {
        if !self.is_pending() {
            return Err(Error::State(format!(
                "transaction {} is already {}",
                self.id, self.status
            )));
        }
        if !status.is_terminal() {
            return Err(Error::State(format!(
                "transaction {} cannot be resolved to {}",
                self.id, status
            )));
        }
        self.status = status;
        Ok(())
    }

    /// Short human description, e.g. "Sent to Alice"
    pub fn describe(&self) -> String {
        match self.direction {
            Direction::Sent => format!("Sent to {}", self.counterparty),
            Direction::Received => format!("Received from {}", self.counterparty),
        }
    }
}
