// Config command: Manage earnclock preferences
use crate::config::{Config, CONFIG_FILE};
use crate::errors::{EarnError, Result};
use colored::Colorize;
use std::fs;

const TEMPLATE_CONFIG: &str = r#"# earnclock configuration file
#
# Preferences shared by every `ec` command.

# Default hourly rate used by `ec watch` and `ec calc`
# (also settable with `ec rate <amount>`)
hourly_rate: 0.0

# Symbol printed in front of amounts
currency: "$"

# Digits after the decimal point when printing amounts (0-8)
decimals: 2

# Milliseconds between display updates while watching.
# Slower ticks save work; they never change what you earn.
tick_interval_ms: 1000

# Save the running session every N ticks (0 disables autosave)
autosave_every: 30
"#;

/// Write a commented config file
pub fn init(force: bool) -> Result<()> {
    let home = Config::home_dir()?;
    let config_path = home.join(CONFIG_FILE);

    if config_path.exists() && !force {
        return Err(EarnError::ConfigError(format!(
            "{} already exists. Use --force to overwrite it.",
            config_path.display()
        )));
    }

    fs::create_dir_all(&home)?;
    fs::write(&config_path, TEMPLATE_CONFIG)?;

    println!("{}", "✓ Configuration file created!".bright_green());
    println!(
        "\nCreated: {}",
        config_path.display().to_string().bright_cyan()
    );
    println!("\nNext steps:");
    println!("  1. Set your rate: {}", "ec rate 25".bright_cyan());
    println!("  2. Start tracking: {}", "ec watch".bright_cyan());

    Ok(())
}

/// Validate config file syntax and values
pub fn validate() -> Result<()> {
    let home = Config::home_dir()?;
    let config_path = home.join(CONFIG_FILE);

    if !config_path.exists() {
        println!("{}", "⚠ No configuration file found".bright_yellow());
        println!("\n{}:", "Suggestions".bright_yellow());
        println!("  • Create one: {}", "ec config init".bright_cyan());
        println!("  • earnclock works without a config file");
        return Ok(());
    }

    print!("Validating {}...", config_path.display());

    match Config::load(&home).and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => {
            println!(" {}", "✓".bright_green());
            println!("\n{}", "Configuration is valid!".bright_green().bold());

            println!("\n{}:", "Summary".bright_cyan().bold());
            if config.hourly_rate > 0.0 {
                println!("  • Hourly rate: {}{}", config.currency, config.hourly_rate);
            } else {
                println!("  • No hourly rate set");
            }
            println!("  • Ticks every {} ms", config.tick_interval_ms);
            if config.autosave_every > 0 {
                println!("  • Autosave every {} ticks", config.autosave_every);
            } else {
                println!("  • Autosave disabled");
            }

            Ok(())
        }
        Err(e) => {
            println!(" {}", "✗".bright_red());
            println!(
                "\n{}: Configuration is invalid",
                "Error".bright_red().bold()
            );
            println!("\n{}", e);

            println!("\n{}:", "Suggestions".bright_yellow());
            println!("  • Check YAML syntax");
            println!(
                "  • See example: {}",
                "ec config init --force".bright_cyan()
            );
            println!(
                "  • Edit config: {}",
                format!("$EDITOR {}", config_path.display()).bright_cyan()
            );

            Err(e)
        }
    }
}

/// Show the effective configuration
pub fn show() -> Result<()> {
    let home = Config::home_dir()?;
    let config_path = home.join(CONFIG_FILE);
    let config = Config::load(&home)?;

    println!("{}", "Configuration".bright_cyan().bold());
    println!("{}", "=".repeat(70));
    if config_path.exists() {
        println!("Loaded from {}", config_path.display().to_string().bright_cyan());
    } else {
        println!("{}", "No config file, showing defaults".bright_yellow());
    }
    println!("{}", "=".repeat(70));

    let yaml = serde_yml::to_string(&config)
        .map_err(|e| EarnError::ConfigError(format!("Failed to serialize config: {}", e)))?;
    println!("{}", yaml);

    Ok(())
}

/// Print the config file location
pub fn path() -> Result<()> {
    let home = Config::home_dir()?;
    println!("{}", home.join(CONFIG_FILE).display());
    Ok(())
}
