//! Wire types for `POST /api/transactions`

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::transfer::parse_decimal;
use crate::domain::{decide, TransactionRecord, TransactionStatus};

/// Request body as sent by the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingTransfer<'a> {
    pub user_id: &'a str,
    pub tx: &'a TransactionRecord,
}

/// Request body as accepted by the server.
///
/// Only `tx` is required. Browser clients send `amount` as a JSON number,
/// this crate's client sends a decimal string; both are accepted. A missing,
/// null or non-numeric amount is never above the threshold.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingTransfer {
    #[serde(default)]
    pub user_id: Option<String>,
    pub tx: IncomingTx,
}

#[derive(Debug, Deserialize)]
pub struct IncomingTx {
    #[serde(default)]
    pub id: Option<JsonValue>,
    #[serde(default)]
    pub amount: JsonValue,
}

impl IncomingTx {
    /// The amount as a decimal, `None` if it is not numeric
    pub fn amount(&self) -> Option<Decimal> {
        match &self.amount {
            JsonValue::Number(n) => parse_decimal(&n.to_string()),
            JsonValue::String(s) => parse_decimal(s),
            _ => None,
        }
    }

    /// The amount as a float, for values outside `Decimal`'s range
    fn amount_f64(&self) -> Option<f64> {
        match &self.amount {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse::<f64>().ok(),
            JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Decide this transfer against `threshold`
    pub fn decision(&self, threshold: Decimal) -> TransactionStatus {
        if let Some(amount) = self.amount() {
            return decide(amount, threshold);
        }
        let over = match (self.amount_f64(), threshold.to_f64()) {
            (Some(amount), Some(threshold)) => amount > threshold,
            _ => false,
        };
        if over {
            TransactionStatus::Failed
        } else {
            TransactionStatus::Completed
        }
    }

    /// The transaction id for log lines
    pub fn id_label(&self) -> String {
        match &self.id {
            Some(JsonValue::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "-".to_string(),
        }
    }
}

/// 200 response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub status: TransactionStatus,
}

/// 405 / 500 response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> IncomingTransfer {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_amount_as_number_or_string() {
        let req = parse(r#"{"userId":"u1","tx":{"id":"t1","amount":200}}"#);
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.tx.amount(), Some(Decimal::from(200)));
        assert_eq!(req.tx.id_label(), "t1");

        let req = parse(r#"{"tx":{"amount":"6000.50"}}"#);
        assert_eq!(req.tx.amount(), Some(Decimal::new(600050, 2)));
        assert_eq!(req.tx.id_label(), "-");
    }

    #[test]
    fn test_non_numeric_amount() {
        let req = parse(r#"{"tx":{"amount":"lots"}}"#);
        assert_eq!(req.tx.amount(), None);

        let req = parse(r#"{"tx":{"amount":null}}"#);
        assert_eq!(req.tx.amount(), None);
    }

    #[test]
    fn test_decision_for_odd_amounts() {
        let threshold = Decimal::from(5000);
        for body in [
            r#"{"tx":{"amount":"lots"}}"#,
            r#"{"tx":{"amount":null}}"#,
            r#"{"tx":{"id":"x"}}"#,
            r#"{"tx":{"amount":""}}"#,
        ] {
            assert_eq!(parse(body).tx.decision(threshold), TransactionStatus::Completed, "{body}");
        }
        assert_eq!(
            parse(r#"{"tx":{"amount":"1e30"}}"#).tx.decision(threshold),
            TransactionStatus::Failed
        );
        assert_eq!(
            parse(r#"{"tx":{"amount":6000}}"#).tx.decision(threshold),
            TransactionStatus::Failed
        );
    }

    #[test]
    fn test_missing_tx_is_an_error() {
        assert!(serde_json::from_str::<IncomingTransfer>(r#"{"userId":"u1"}"#).is_err());
    }

    #[test]
    fn test_outgoing_shape() {
        let tx = TransactionRecord::outgoing("Alice", Decimal::from(200));
        let body = OutgoingTransfer { user_id: "u1", tx: &tx };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["tx"]["amount"], "200");
        assert_eq!(json["tx"]["status"], "pending");
    }
}
