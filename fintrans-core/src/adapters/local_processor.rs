//! In-process transfer processor
//!
//! Applies the same delay and threshold rule as the HTTP service without a
//! network hop. Used when no processor URL is configured.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{decide, TransactionRecord, TransactionStatus};
use crate::ports::TransferProcessor;
use crate::server::ServerConfig;

pub struct LocalProcessor {
    delay: Duration,
    failure_threshold: Decimal,
}

impl LocalProcessor {
    pub fn new(delay: Duration, failure_threshold: Decimal) -> Self {
        Self {
            delay,
            failure_threshold,
        }
    }
}

impl From<ServerConfig> for LocalProcessor {
    fn from(config: ServerConfig) -> Self {
        Self::new(config.delay, config.failure_threshold)
    }
}

#[async_trait]
impl TransferProcessor for LocalProcessor {
    fn name(&self) -> &str {
        "local"
    }

    async fn process(&self, _user_id: &str, tx: &TransactionRecord) -> Result<TransactionStatus> {
        tokio::time::sleep(self.delay).await;
        Ok(decide(tx.amount, self.failure_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerConfig;

    #[tokio::test(start_paused = true)]
    async fn test_local_decisions_after_delay() {
        let processor = LocalProcessor::from(ServerConfig::default());
        let start = tokio::time::Instant::now();

        let small = TransactionRecord::outgoing("Alice", Decimal::from(200));
        assert_eq!(
            processor.process("u1", &small).await.unwrap(),
            TransactionStatus::Completed
        );
        assert!(start.elapsed() >= Duration::from_millis(1000));

        let large = TransactionRecord::outgoing("Carl", Decimal::from(6000));
        assert_eq!(
            processor.process("u1", &large).await.unwrap(),
            TransactionStatus::Failed
        );
    }
}
