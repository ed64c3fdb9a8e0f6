//! Request handlers

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::{DecisionResponse, ErrorResponse, IncomingTransfer};
use super::ServerState;

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("server error")),
    )
        .into_response()
}

/// `POST /api/transactions`
pub async fn create_transaction(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let request: IncomingTransfer = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "rejecting malformed transfer request");
            return server_error();
        }
    };

    let tx_id = request.tx.id_label();

    tokio::time::sleep(state.config.delay).await;

    let status = request.tx.decision(state.config.failure_threshold);
    tracing::info!(
        tx_id = %tx_id,
        user_id = request.user_id.as_deref().unwrap_or("-"),
        %status,
        "transfer decided"
    );

    (StatusCode::OK, Json(DecisionResponse { status })).into_response()
}

/// Any method other than POST on the transactions path
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
        .into_response()
}

/// `GET /api/health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
