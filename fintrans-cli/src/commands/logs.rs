//! `ft logs` - inspect the event log

use anyhow::Result;
use chrono::{Local, TimeZone};
use clap::Subcommand;
use colored::Colorize;

use fintrans_core::services::logging::{now_ms, LogEntry};
use fintrans_core::{EntryPoint, LoggingService};

use super::get_data_dir;
use crate::output;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, or the trail of one transfer
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only failures
        #[arg(long)]
        errors: bool,
        /// Show every event for this transfer id (a prefix is enough)
        #[arg(long, conflicts_with = "errors")]
        transfer: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete old events
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Count events by type
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn open_log() -> Result<LoggingService> {
    LoggingService::new(&get_data_dir()?, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn local_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// First 8 characters of a transfer id
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn event_label(entry: &LogEntry) -> String {
    match entry.event.as_str() {
        "transfer_completed" => entry.event.green().to_string(),
        "transfer_declined" | "transfer_rejected" => entry.event.yellow().to_string(),
        _ if entry.error_message.is_some() => entry.event.red().to_string(),
        _ => entry.event.clone(),
    }
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List {
            limit,
            errors,
            transfer,
            json,
        } => {
            let service = open_log()?;
            let entries = match &transfer {
                Some(id) => service.get_transfer_trail(id)?,
                None if errors => service.get_errors(limit)?,
                None => service.get_recent(limit)?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            if let Some(id) = transfer {
                print_trail(&id, &entries);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Event", "Transfer", "Status", "Detail"]);
            for entry in &entries {
                table.add_row(vec![
                    local_time(entry.timestamp),
                    event_label(entry),
                    entry.transfer_id.as_deref().map(short_id).unwrap_or("").to_string(),
                    entry.status.clone().unwrap_or_default(),
                    entry
                        .error_message
                        .clone()
                        .or_else(|| entry.command.clone())
                        .unwrap_or_default(),
                ]);
            }
            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            if !force && !json {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete events older than {} days?", older_than_days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let cutoff = cutoff_ms(now_ms(), older_than_days);
            let deleted = open_log()?.delete_before(cutoff)?;

            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                output::success(&format!("Deleted {} events", deleted));
            }
        }
        LogsCommands::Stats { json } => {
            let service = open_log()?;
            let total = service.count()?;
            let errors = service.count_errors()?;
            let by_event = service.count_by_event()?;

            if json {
                let events: serde_json::Map<String, serde_json::Value> = by_event
                    .into_iter()
                    .map(|(event, n)| (event, n.into()))
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "total": total,
                        "errors": errors,
                        "events": events,
                        "database_path": service.db_path().to_string_lossy(),
                    })
                );
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Event", "Count"]);
            for (event, n) in by_event {
                table.add_row(vec![event, n.to_string()]);
            }
            println!("{}", table);
            println!("  Total: {}  Errors: {}", total, errors);
            println!("  {}", service.db_path().display().to_string().dimmed());
        }
    }

    Ok(())
}

/// Unix-ms timestamp `days` before `now`, clamped at the epoch
fn cutoff_ms(now: i64, days: u64) -> i64 {
    let span = i64::try_from(days)
        .ok()
        .and_then(|days| days.checked_mul(MS_PER_DAY))
        .unwrap_or(i64::MAX);
    now.saturating_sub(span).max(0)
}

/// `submitted -> completed` style view of one transfer
fn print_trail(id: &str, entries: &[LogEntry]) {
    println!("{} {}", "Transfer".bold(), id);
    for entry in entries {
        let status = entry.status.as_deref().unwrap_or("-");
        print!(
            "  {}  {:<22} {}",
            local_time(entry.timestamp).dimmed(),
            event_label(entry),
            status
        );
        match &entry.error_message {
            Some(message) => println!("  ({})", message.red()),
            None => println!(),
        }
    }
}
