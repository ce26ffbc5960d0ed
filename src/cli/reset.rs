// Reset command: discard the saved session, keep the configured rate
use crate::config::Config;
use crate::errors::{EarnError, Result};
use crate::state::SessionStore;
use colored::Colorize;
use dialoguer::Confirm;

pub fn run(yes: bool) -> Result<()> {
    let home = Config::home_dir()?;
    let store = SessionStore::new(&home)?;

    if !store.path().exists() {
        println!("{}", "No saved session to reset.".bright_yellow());
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Discard the saved session?")
            .default(false)
            .interact()
            .map_err(|e| EarnError::InvalidInput(format!("Confirmation failed: {}", e)))?;
        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    store.clear()?;
    println!("{}", "✓ Session cleared".bright_green());
    println!("  Your hourly rate is kept in {}", "ec rate".bright_cyan());

    Ok(())
}
