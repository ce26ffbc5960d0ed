// Calc command: earnings for a given duration, without waiting for it
use crate::cli::render_state;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::errors::{EarnError, Result};
use crate::format::parse_duration_secs;
use crate::scheduler::IntervalScheduler;
use crate::time::ManualTimeSource;
use std::sync::Arc;

pub fn run(rate: Option<f64>, elapsed: &str, json: bool) -> Result<()> {
    let home = Config::home_dir()?;
    let config = Config::load_or_default(&home);

    let rate = rate.unwrap_or(config.hourly_rate);
    if !rate.is_finite() || rate < 0.0 {
        return Err(EarnError::InvalidInput(format!(
            "hourly rate must be a non-negative number (got {})",
            rate
        )));
    }
    let seconds = parse_duration_secs(elapsed)?;

    let mut coordinator = Coordinator::new(
        Arc::new(ManualTimeSource::new()),
        Box::new(IntervalScheduler::new()),
    );
    coordinator.set_hourly_rate(rate);
    coordinator.restore(seconds)?;
    let state = coordinator.state();

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", render_state(&state, &config));
    }

    Ok(())
}
