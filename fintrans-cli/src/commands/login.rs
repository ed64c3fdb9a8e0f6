//! Login / logout commands

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};

use super::get_context;
use crate::output;

pub fn run(name: Option<String>, pin: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context("login")?;

    let name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Name")
            .allow_empty(true)
            .interact_text()?,
    };

    let pin = match pin {
        Some(p) => p,
        None if json => String::new(),
        None => Password::new()
            .with_prompt("PIN")
            .allow_empty_password(true)
            .interact()?,
    };

    let profile = ctx.sign_in(&name, &pin)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    output::success(&format!("Signed in as {}", profile.name));
    println!("  Balance: {}", output::format_money(profile.balance).bold());
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let ctx = get_context("logout")?;

    match ctx.current_user()? {
        Some(profile) => {
            ctx.logout()?;
            output::success(&format!("Signed out {}", profile.name));
        }
        None => output::warning("Not signed in."),
    }
    Ok(())
}
