// Error suggestion system for better user experience
use crate::errors::EarnError;
use colored::Colorize;

/// Display an error with helpful suggestions
pub fn display_error_with_suggestions(error: &EarnError) {
    eprintln!("\n{}: {}", "Error".bright_red().bold(), error);

    match error {
        EarnError::NonPositiveRate(_) => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!(
                "  • Pass a rate for this run: {}",
                "ec watch --rate 25".bright_cyan()
            );
            eprintln!(
                "  • Save a default rate: {}",
                "ec rate 25".bright_cyan()
            );
        }

        EarnError::NoSession => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!("  • Start tracking: {}", "ec watch".bright_cyan());
            eprintln!("  • Sessions are saved when a watch ends");
        }

        EarnError::ConfigError(_) => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!("  • Check the config: {}", "ec config validate".bright_cyan());
            eprintln!("  • Show where it lives: {}", "ec config path".bright_cyan());
            eprintln!(
                "  • Start over with defaults: {}",
                "ec config init --force".bright_cyan()
            );
        }

        EarnError::StateError(_) => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!(
                "  • Discard the saved session: {}",
                "ec reset --yes".bright_cyan()
            );
        }

        EarnError::InvalidInput(_) => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!("  • Durations accept SECONDS, MM:SS or HH:MM:SS");
            eprintln!("  • Rates must be non-negative numbers");
        }

        EarnError::Io(_) | EarnError::Json(_) => {}
    }

    eprintln!();
}
