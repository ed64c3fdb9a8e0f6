//! Output formatting utilities

use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::{Decimal, RoundingStrategy};

use fintrans_core::TransactionStatus;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// `$1234.50`, half-cents rounded away from zero
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

/// `Jan 5, 2025 3:04 PM` in local time
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%b %-d, %Y %-I:%M %p")
        .to_string()
}

/// Status word colored green / yellow / red
pub fn status_label(status: TransactionStatus) -> ColoredString {
    match status {
        TransactionStatus::Completed => status.as_str().green(),
        TransactionStatus::Pending => status.as_str().yellow(),
        TransactionStatus::Failed => status.as_str().red(),
    }
}
