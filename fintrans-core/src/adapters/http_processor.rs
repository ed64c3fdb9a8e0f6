//! HTTP transfer processor client
//!
//! Posts `{ userId, tx }` to `<base>/api/transactions` and reads the
//! `{ status }` decision. Anything other than a 2xx reply with a terminal
//! status is reported as an error, which the wallet treats as "no decision".

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::result::{Error, Result};
use crate::domain::{TransactionRecord, TransactionStatus};
use crate::ports::TransferProcessor;
use crate::server::types::{DecisionResponse, OutgoingTransfer};

/// Client for a remote processor
pub struct HttpProcessor {
    client: Client,
    endpoint: String,
}

impl HttpProcessor {
    /// Create a client for the service at `base_url` (e.g. `http://127.0.0.1:3000`)
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/transactions", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TransferProcessor for HttpProcessor {
    fn name(&self) -> &str {
        "http"
    }

    async fn process(&self, user_id: &str, tx: &TransactionRecord) -> Result<TransactionStatus> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&OutgoingTransfer { user_id, tx })
            .send()
            .await
            .map_err(|e| Error::processor(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::processor(format!(
                "processor returned HTTP {}",
                status.as_u16()
            )));
        }

        let decision: DecisionResponse = response
            .json()
            .await
            .map_err(|e| Error::processor(format!("invalid processor response: {}", e)))?;

        if !decision.status.is_terminal() {
            return Err(Error::processor(format!(
                "processor returned non-terminal status {}",
                decision.status
            )));
        }

        Ok(decision.status)
    }
}
