//! CLI command implementations

pub mod config;
pub mod history;
pub mod login;
pub mod logs;
pub mod send;
pub mod serve;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use fintrans_core::services::WalletService;
use fintrans_core::{EntryPoint, FintransContext, LoggingService};

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FINTRANS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".fintrans"))
}

/// Create the client context and record which command is running
pub fn get_context(command: &str) -> Result<FintransContext> {
    let data_dir = get_data_dir()?;
    let ctx = FintransContext::new(&data_dir, EntryPoint::Cli)
        .with_context(|| format!("Failed to open data directory: {:?}", data_dir))?;
    if let Some(events) = &ctx.events {
        let _ = events.log_command(command);
    }
    Ok(ctx)
}

/// Record a failed command in the event log, ignoring any errors
pub fn log_failure(error: &anyhow::Error) {
    let Ok(data_dir) = get_data_dir() else {
        return;
    };
    if let Ok(events) = LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")) {
        let _ = events.log_error("command_failed", &error.to_string(), None);
    }
}

/// Open the signed-in user's wallet, with a hint when nobody is signed in
pub fn get_wallet(ctx: &FintransContext) -> Result<WalletService> {
    match ctx.current_user()? {
        Some(_) => Ok(ctx.wallet()?),
        None => anyhow::bail!("Not signed in. Use 'ft login' first."),
    }
}

/// Run an async command body on a fresh runtime
pub fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
