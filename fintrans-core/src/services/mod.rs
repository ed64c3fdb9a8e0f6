//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod history;
pub mod logging;
mod profile;
mod status;
mod wallet;

pub use history::{history_key, TransactionLogStore};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use profile::{ProfileStore, PROFILE_KEY};
pub use status::WalletSummary;
pub use wallet::{PendingTransfer, TransferDraft, TransferOutcome, WalletService};
