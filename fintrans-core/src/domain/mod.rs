//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external dependencies.

mod profile;
pub mod result;
mod transaction;
pub mod transfer;

pub use profile::{UserProfile, DEFAULT_STARTING_BALANCE};
pub use transaction::{Direction, TransactionRecord, TransactionStatus};
pub use transfer::{
    decide, parse_amount, validate_transfer, TransferRejection, ValidatedTransfer,
    DEFAULT_FAILURE_THRESHOLD,
};
