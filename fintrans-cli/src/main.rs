//! Fintrans CLI - mock money transfers in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, history, login, logs, send, serve, status};

/// Fintrans - send mock transfers and watch them settle
#[derive(Parser)]
#[command(name = "ft", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in (demo: any name works, the PIN is not checked)
    Login {
        /// Display name
        name: Option<String>,
        /// PIN
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out; transaction history is kept
    Logout,

    /// Show balance and transaction counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send money
    Send {
        /// Recipient name
        recipient: Option<String>,
        /// Amount
        amount: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show transaction history, newest first
    History {
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the mock transfer processor HTTP service
    Serve {
        /// Address to bind (default from settings, then 127.0.0.1:3000)
        #[arg(long)]
        bind: Option<String>,
        /// Processing delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Amount above which transfers fail
        #[arg(long)]
        threshold: Option<String>,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    fintrans_core::server::init_tracing(default_filter);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_failure(&e);
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { name, pin, json } => login::run(name, pin, json),
        Commands::Logout => login::run_logout(),
        Commands::Status { json } => status::run(json),
        Commands::Send { recipient, amount, json } => send::run(recipient, amount, json),
        Commands::History { limit, json } => history::run(limit, json),
        Commands::Serve { bind, delay_ms, threshold } => serve::run(bind, delay_ms, threshold),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
