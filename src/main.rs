use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use earnclock::cli;
use earnclock::errors::Result;
use earnclock::{logging, suggestions};

#[derive(Parser)]
#[command(name = "ec")]
#[command(about = "Watch your earnings tick up while you work", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track time and show earnings live
    Watch {
        /// Hourly rate for this run (defaults to the saved rate)
        #[arg(short, long)]
        rate: Option<f64>,
        /// Milliseconds between updates
        #[arg(short, long = "interval-ms")]
        interval_ms: Option<u64>,
        /// Stop after this long (SECONDS, MM:SS or HH:MM:SS)
        #[arg(long = "for", value_name = "DURATION")]
        duration: Option<String>,
        /// Stop once this amount has been earned
        #[arg(long)]
        until_amount: Option<f64>,
        /// Continue the saved session
        #[arg(long)]
        resume: bool,
        /// Emit one JSON state per tick
        #[arg(long)]
        json: bool,
    },
    /// Show or set the default hourly rate
    Rate {
        /// New hourly rate
        value: Option<f64>,
    },
    /// Compute earnings for a duration without waiting
    Calc {
        /// Hourly rate (defaults to the saved rate)
        #[arg(short, long)]
        rate: Option<f64>,
        /// Elapsed time (SECONDS, MM:SS or HH:MM:SS)
        #[arg(short, long)]
        elapsed: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the saved session
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Discard the saved session (the rate is kept)
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Create a commented config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration
    Show,
    /// Validate the config file
    Validate,
    /// Print the config file path
    Path,
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Watch {
            rate,
            interval_ms,
            duration,
            until_amount,
            resume,
            json,
        } => cli::watch::run(cli::watch::WatchOptions {
            rate,
            interval_ms,
            duration,
            until_amount,
            resume,
            json,
        })?,
        Commands::Rate { value } => cli::rate::run(value)?,
        Commands::Calc {
            rate,
            elapsed,
            json,
        } => cli::calc::run(rate, &elapsed, json)?,
        Commands::Status { json } => cli::status::run(json)?,
        Commands::Reset { yes } => cli::reset::run(yes)?,
        Commands::Config { command } => match command {
            ConfigCommands::Init { force } => cli::config_cmd::init(force)?,
            ConfigCommands::Show => cli::config_cmd::show()?,
            ConfigCommands::Validate => cli::config_cmd::validate()?,
            ConfigCommands::Path => cli::config_cmd::path()?,
        },
        Commands::Completions { shell } => cli::completions::run(shell, &mut Cli::command())?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: {}", e);
    }

    if let Err(e) = run(cli) {
        suggestions::display_error_with_suggestions(&e);
        std::process::exit(1);
    }
}
