//! Transfer processor port - the remote approval decision

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{TransactionRecord, TransactionStatus};

/// Decides whether a submitted transfer goes through.
///
/// `Ok` carries the processor's decision (`completed` or `failed`). `Err`
/// means no decision was obtained at all (network failure, server error,
/// undecodable reply) and the caller must treat the transfer as rolled back.
#[async_trait]
pub trait TransferProcessor: Send + Sync {
    /// Processor name (e.g., "http", "local")
    fn name(&self) -> &str;

    /// Submit a pending record for a decision
    async fn process(&self, user_id: &str, tx: &TransactionRecord) -> Result<TransactionStatus>;
}
