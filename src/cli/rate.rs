// Rate command: show or persist the default hourly rate
use crate::cli::print_rate;
use crate::config::Config;
use crate::errors::{EarnError, Result};
use colored::Colorize;

pub fn run(value: Option<f64>) -> Result<()> {
    let home = Config::home_dir()?;
    let mut config = Config::load(&home)?;

    let Some(rate) = value else {
        println!("{}", "Current Rate".bright_cyan().bold());
        print_rate(config.hourly_rate, &config);
        if config.hourly_rate <= 0.0 {
            println!(
                "\n{}: set one with {}",
                "Tip".bright_yellow(),
                "ec rate <amount>".bright_cyan()
            );
        }
        return Ok(());
    };

    if !rate.is_finite() || rate < 0.0 {
        return Err(EarnError::InvalidInput(format!(
            "hourly rate must be a non-negative number (got {})",
            rate
        )));
    }

    config.hourly_rate = rate;
    config.save(&home)?;
    tracing::info!(rate, "saved hourly rate");

    println!("{}", "✓ Hourly rate saved".bright_green());
    print_rate(rate, &config);

    Ok(())
}
