//! Serve command - run the mock transfer processor

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use fintrans_core::domain::transfer::parse_decimal;
use fintrans_core::server::{self, ServerConfig};
use fintrans_core::{EntryPoint, FintransContext, LogEvent};

use super::get_data_dir;

pub fn run(bind: Option<String>, delay_ms: Option<u64>, threshold: Option<String>) -> Result<()> {
    let data_dir = get_data_dir()?;
    let ctx = FintransContext::new(&data_dir, EntryPoint::Server)
        .with_context(|| format!("Failed to open data directory: {:?}", data_dir))?;

    let mut config = ServerConfig::from(&ctx.config);
    if let Some(ms) = delay_ms {
        config.delay = Duration::from_millis(ms);
    }
    if let Some(raw) = threshold {
        config.failure_threshold =
            parse_decimal(&raw).with_context(|| format!("Invalid threshold: {}", raw))?;
    }
    let bind = bind.unwrap_or_else(|| ctx.config.server_bind.clone());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let listener = TcpListener::bind(&bind)
            .await
            .with_context(|| format!("Failed to bind {}", bind))?;

        ctx.log(LogEvent::new("server_started").with_command("serve"));

        server::serve(listener, config).await
    })
}
