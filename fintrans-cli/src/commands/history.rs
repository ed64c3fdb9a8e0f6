//! History command - list transactions, newest first

use anyhow::Result;

use super::{get_context, get_wallet};
use crate::output;

pub fn run(limit: Option<usize>, json: bool) -> Result<()> {
    let ctx = get_context("history")?;
    let mut records = get_wallet(&ctx)?.history();
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Transaction", "Amount", "Status"]);

    for record in &records {
        table.add_row(vec![
            output::format_timestamp(record.timestamp),
            record.describe(),
            output::format_money(record.amount),
            output::status_label(record.status).to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}
