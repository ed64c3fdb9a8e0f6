//! Config command - show or change settings

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use fintrans_core::config::{Config, PROCESSOR_URL_ENV};
use fintrans_core::domain::transfer::parse_decimal;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// Remote processor base URL (empty string switches to in-process)
        #[arg(long)]
        processor_url: Option<String>,
        /// In-process processing delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Amount above which transfers fail
        #[arg(long)]
        threshold: Option<String>,
        /// Balance given to new sign-ins
        #[arg(long)]
        starting_balance: Option<String>,
        /// Default bind address for `ft serve`
        #[arg(long)]
        bind: Option<String>,
    },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show { json: false }) {
        ConfigCommands::Show { json } => show(json),
        ConfigCommands::Set {
            processor_url,
            delay_ms,
            threshold,
            starting_balance,
            bind,
        } => {
            let data_dir = get_data_dir()?;
            let mut config = Config::load(&data_dir)?;

            if let Some(url) = processor_url {
                config.processor_url = Some(url).filter(|u| !u.trim().is_empty());
            }
            if let Some(ms) = delay_ms {
                config.processor_delay = Duration::from_millis(ms);
            }
            if let Some(raw) = threshold {
                config.failure_threshold =
                    parse_decimal(&raw).with_context(|| format!("Invalid threshold: {}", raw))?;
            }
            if let Some(raw) = starting_balance {
                config.starting_balance = parse_decimal(&raw)
                    .with_context(|| format!("Invalid starting balance: {}", raw))?;
            }
            if let Some(bind) = bind {
                config.server_bind = bind;
            }

            config.save(&data_dir)?;
            output::success("Settings saved");
            show(false)
        }
    }
}

fn show(json: bool) -> Result<()> {
    let data_dir = get_data_dir()?;
    let config = Config::load(&data_dir)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "dataDir": data_dir.to_string_lossy(),
                "processorUrl": config.processor_url,
                "processorUrlOverride": config.processor_url_override,
                "effectiveProcessorUrl": config.effective_processor_url(),
                "processorDelayMs": config.processor_delay.as_millis() as u64,
                "failureThreshold": config.failure_threshold.to_string(),
                "startingBalance": config.starting_balance.to_string(),
                "serverBind": config.server_bind,
            })
        );
        return Ok(());
    }

    println!("{}", "Settings".bold());
    println!("  Data directory:    {}", data_dir.display());
    println!(
        "  Processor:         {}",
        config.effective_processor_url().unwrap_or("in-process")
    );
    if config.processor_url_override.is_some() {
        println!(
            "                     {}",
            format!("(from {})", PROCESSOR_URL_ENV).dimmed()
        );
    }
    println!(
        "  Processing delay:  {} ms",
        config.processor_delay.as_millis()
    );
    println!(
        "  Failure threshold: {}",
        output::format_money(config.failure_threshold)
    );
    println!(
        "  Starting balance:  {}",
        output::format_money(config.starting_balance)
    );
    println!("  Server bind:       {}", config.server_bind);
    Ok(())
}
