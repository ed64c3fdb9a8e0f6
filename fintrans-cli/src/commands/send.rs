//! Send command - submit a transfer and wait for the processor's decision

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

use fintrans_core::services::TransferOutcome;
use fintrans_core::{OperationResult, TransactionStatus};

use super::{block_on, get_context, get_wallet};
use crate::output;

pub fn run(recipient: Option<String>, amount: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context("send")?;
    let wallet = get_wallet(&ctx)?;

    let recipient: String = match recipient {
        Some(r) => r,
        None => Input::new()
            .with_prompt("Recipient")
            .allow_empty(true)
            .interact_text()?,
    };
    wallet.set_recipient(recipient);

    let amount: String = match amount {
        Some(a) => a,
        None => Input::new()
            .with_prompt("Amount")
            .allow_empty(true)
            .interact_text()?,
    };
    wallet.set_amount(amount);

    let pending = match wallet.begin_draft() {
        Ok(pending) => pending,
        Err(e) => {
            if json {
                let result: OperationResult<TransferOutcome> = OperationResult::fail(e.to_string());
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            return Err(e.into());
        }
    };

    let spinner = (!json).then(|| {
        output::info(&format!(
            "Sending {} to {}. Balance is now {}.",
            output::format_money(pending.record().amount),
            pending.record().counterparty,
            output::format_money(wallet.balance())
        ));
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Processing via {}...", ctx.processor.name()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });

    let outcome = block_on(pending.resolve())?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        let result = OperationResult::ok(outcome.clone())
            .with_context("rolledBack", serde_json::json!(outcome.rolled_back));
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &TransferOutcome) {
    let record = &outcome.record;
    let amount = output::format_money(record.amount);

    match (record.status, outcome.rolled_back) {
        (TransactionStatus::Completed, _) => {
            output::success(&format!("Sent {} to {}", amount, record.counterparty));
        }
        (TransactionStatus::Failed, false) => {
            output::error(&format!(
                "Transfer of {} to {} was declined (balance not refunded)",
                amount, record.counterparty
            ));
        }
        (TransactionStatus::Failed, true) => {
            output::warning(&format!(
                "Transfer of {} to {} could not be processed and was refunded",
                amount, record.counterparty
            ));
            if let Some(error) = &outcome.error {
                println!("  {}", error.dimmed());
            }
        }
        (TransactionStatus::Pending, _) => {
            output::warning(&format!("Transfer to {} is still pending", record.counterparty));
        }
    }

    println!(
        "  Balance: {}",
        output::format_money(outcome.balance).bold()
    );
}
