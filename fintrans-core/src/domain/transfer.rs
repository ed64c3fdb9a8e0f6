//! Transfer validation and the processor decision rule

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::transaction::TransactionStatus;

/// Amount above which the mock processor declines a transfer
pub const DEFAULT_FAILURE_THRESHOLD: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Why a transfer was refused before anything changed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferRejection {
    #[error("Invalid")]
    EmptyRecipient,

    #[error("Invalid")]
    InvalidAmount,

    #[error("Insufficient funds")]
    InsufficientFunds,
}

/// A transfer that passed validation against a balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub recipient: String,
    pub amount: Decimal,
}

/// Parse a decimal from user or wire input.
///
/// Accepts surrounding whitespace and scientific notation (`1e3`).
/// Returns `None` for anything that is not a finite number.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parse a transfer amount, which must be strictly positive
pub fn parse_amount(input: &str) -> Option<Decimal> {
    parse_decimal(input).filter(|amount| *amount > Decimal::ZERO)
}

/// Check a transfer request against the current balance.
///
/// Recipient and amount problems are reported before balance problems. The
/// recipient is trimmed, so a whitespace-only name counts as empty. A positive
/// amount too large for `Decimal` (`1e30`, `Infinity`) can never be covered
/// and is reported as insufficient funds rather than invalid. Only the exact
/// spelling `Infinity` counts as infinite; `inf` is invalid. Positive amounts
/// too small for `Decimal` (`1e-29`) are invalid.
pub fn validate_transfer(
    balance: Decimal,
    recipient: &str,
    amount_input: &str,
) -> Result<ValidatedTransfer, TransferRejection> {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err(TransferRejection::EmptyRecipient);
    }

    let Some(amount) = parse_amount(amount_input) else {
        return Err(if is_out_of_range(amount_input) {
            TransferRejection::InsufficientFunds
        } else {
            TransferRejection::InvalidAmount
        });
    };

    if amount > balance {
        return Err(TransferRejection::InsufficientFunds);
    }

    Ok(ValidatedTransfer {
        recipient: recipient.to_string(),
        amount,
    })
}

/// A positive number beyond `Decimal`'s range
fn is_out_of_range(input: &str) -> bool {
    let trimmed = input.trim();
    if matches!(trimmed, "Infinity" | "+Infinity") {
        return true;
    }
    matches!(trimmed.parse::<f64>(), Ok(huge) if huge.is_finite() && huge > 1.0)
}

/// The mock processor's decision for an amount
pub fn decide(amount: Decimal, threshold: Decimal) -> TransactionStatus {
    if amount > threshold {
        TransactionStatus::Failed
    } else {
        TransactionStatus::Completed
    }
}
