// Status command: show the saved session
use crate::cli::print_rate;
use crate::config::Config;
use crate::errors::{EarnError, Result};
use crate::format::{format_amount, format_elapsed};
use crate::state::SessionStore;
use chrono::Local;
use colored::Colorize;

pub fn run(json: bool) -> Result<()> {
    let home = Config::home_dir()?;
    let config = Config::load_or_default(&home);
    let store = SessionStore::new(&home)?;

    let record = store.load()?.ok_or(EarnError::NoSession)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", "Saved Session".bright_cyan().bold());
    println!("{}", "═".repeat(40));
    println!(
        "  {:<15} {}",
        "Elapsed:".bold(),
        format_elapsed(record.elapsed_seconds)
    );
    println!(
        "  {:<15} {}",
        "Earned:".bold(),
        format_amount(record.accrued_amount, &config.currency, config.decimals)
            .bright_green()
            .bold()
    );
    print_rate(record.hourly_rate, &config);
    println!(
        "  {:<15} {}",
        "Saved:".bold(),
        record
            .saved_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!(
        "\nResume with {}",
        "ec watch --resume".bright_cyan()
    );

    Ok(())
}
