// Subcommand implementations for the `ec` binary
pub mod calc;
pub mod completions;
pub mod config_cmd;
pub mod rate;
pub mod reset;
pub mod status;
pub mod watch;

use crate::config::Config;
use crate::coordinator::StateSnapshot;
use crate::format::format_amount;
use colored::Colorize;

/// One-line summary of a state snapshot for terminal output
pub fn render_state(state: &StateSnapshot, config: &Config) -> String {
    let status = if state.running {
        "running".bright_green()
    } else {
        "paused".bright_yellow()
    };

    format!(
        "{}  {}  {}",
        state.formatted_elapsed_time.bold(),
        format_amount(state.accrued_amount, &config.currency, config.decimals)
            .bright_green()
            .bold(),
        status
    )
}

/// Print a rate with its per-second breakdown
pub fn print_rate(hourly_rate: f64, config: &Config) {
    let per_second = hourly_rate / crate::earnings::SECONDS_PER_HOUR;
    println!(
        "  {:<15} {}",
        "Hourly rate:".bold(),
        format_amount(hourly_rate, &config.currency, config.decimals).bright_cyan()
    );
    println!(
        "  {:<15} {}",
        "Per second:".bold(),
        format_amount(per_second, &config.currency, config.decimals.max(4)).dimmed()
    );
}
