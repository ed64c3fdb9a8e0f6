//! Mock transfer processor HTTP service
//!
//! Serves the single decision endpoint the client talks to:
//!
//! - `POST /api/transactions` sleeps for the configured delay, then answers
//!   `{ "status": "completed" | "failed" }` depending on the amount
//! - any other method on that path answers 405 `{ "error": ... }`
//! - a body that cannot be interpreted answers 500 `{ "error": "server error" }`
//!
//! The service keeps no state between requests.

pub mod handlers;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::domain::DEFAULT_FAILURE_THRESHOLD;

/// Default artificial processing delay
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Processor behaviour
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub delay: Duration,
    pub failure_threshold: Decimal,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

impl From<&Config> for ServerConfig {
    fn from(config: &Config) -> Self {
        Self {
            delay: config.processor_delay,
            failure_threshold: config.failure_threshold,
        }
    }
}

/// Shared handler state
pub struct ServerState {
    pub config: ServerConfig,
}

/// Build the router
pub fn router(config: ServerConfig) -> Router {
    let state = Arc::new(ServerState { config });

    Router::new()
        .route(
            "/api/transactions",
            post(handlers::create_transaction).fallback(handlers::method_not_allowed),
        )
        .route("/api/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already-bound listener until the task is dropped
pub async fn serve(listener: TcpListener, config: ServerConfig) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(
        %addr,
        delay_ms = config.delay.as_millis() as u64,
        threshold = %config.failure_threshold,
        "transfer processor listening"
    );
    axum::serve(listener, router(config)).await?;
    Ok(())
}

/// Install the stderr tracing subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
