//! Status command - balance and transaction counts

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{get_context, get_wallet};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("status")?;
    let summary = get_wallet(&ctx)?.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", format!("Welcome, {}", summary.name).bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Balance".to_string(), output::format_money(summary.balance)]);
    table.add_row(vec!["Transactions".to_string(), summary.total_transactions.to_string()]);
    table.add_row(vec!["Completed".to_string(), summary.completed.to_string()]);
    table.add_row(vec!["Failed".to_string(), summary.failed.to_string()]);
    table.add_row(vec!["Pending".to_string(), summary.pending.to_string()]);

    println!("{}", table);

    if summary.pending > 0 {
        println!();
        output::warning("Some transfers never received a decision and are still pending.");
    }

    Ok(())
}
