// Watch command: live earnings ticker
//
// Runs the coordinator on the wall clock, prints a line per tick, autosaves
// the session every few ticks and saves it once more when the run ends,
// including when it is ended with Ctrl-C.

use crate::cli::render_state;
use crate::config::Config;
use crate::coordinator::{Coordinator, StateSnapshot, TickFlow};
use crate::driver::{Driver, RunEnd};
use crate::errors::{EarnError, Result};
use crate::format::{format_amount, parse_duration_secs};
use crate::scheduler::IntervalScheduler;
use crate::state::{SessionRecord, SessionStore};
use crate::time::{SystemTimeSource, TimeSource};
use colored::Colorize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct WatchOptions {
    pub rate: Option<f64>,
    pub interval_ms: Option<u64>,
    pub duration: Option<String>,
    pub until_amount: Option<f64>,
    pub resume: bool,
    pub json: bool,
}

pub fn run(opts: WatchOptions) -> Result<()> {
    let home = Config::home_dir()?;
    let config = Config::load_or_default(&home);
    let store = SessionStore::new(&home)?;

    if let Some(rate) = opts.rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(EarnError::InvalidInput(format!(
                "hourly rate must be a non-negative number (got {})",
                rate
            )));
        }
    }

    let limit = opts
        .duration
        .as_deref()
        .map(parse_duration_secs)
        .transpose()?
        .map(Duration::from_secs);

    let time: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
    let mut coordinator = Coordinator::new(Arc::clone(&time), Box::new(IntervalScheduler::new()));

    if opts.resume {
        let record = store.load()?.ok_or(EarnError::NoSession)?;
        coordinator.set_hourly_rate(opts.rate.unwrap_or(record.hourly_rate));
        coordinator.restore(record.elapsed_seconds)?;
        tracing::info!(elapsed = record.elapsed_seconds, "resuming saved session");
    } else {
        coordinator.set_hourly_rate(opts.rate.unwrap_or(config.hourly_rate));
    }

    let interval_ms = opts.interval_ms.unwrap_or(config.tick_interval_ms);
    if !coordinator.set_tick_interval_ms(interval_ms) {
        return Err(EarnError::InvalidInput(
            "tick interval must be greater than zero".to_string(),
        ));
    }

    subscribe_display(&mut coordinator, &config, opts.json);
    if config.autosave_every > 0 {
        subscribe_autosave(&mut coordinator, store.clone(), config.autosave_every);
    }
    if let Some(target) = opts.until_amount {
        coordinator.subscribe(move |state: &StateSnapshot| -> anyhow::Result<TickFlow> {
            Ok(if state.accrued_amount >= target {
                TickFlow::Stop
            } else {
                TickFlow::Continue
            })
        });
    }

    coordinator.start()?;
    if !opts.json {
        println!(
            "{} at {}/h {}",
            "Tracking".bright_cyan().bold(),
            format_amount(
                coordinator.state().hourly_rate,
                &config.currency,
                config.decimals
            ),
            "(Ctrl-C to pause and save)".dimmed()
        );
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        tracing::warn!("could not install Ctrl-C handler: {}", e);
    }

    let end = Driver::new(time)
        .with_stop_flag(interrupted)
        .run(&mut coordinator, limit);
    coordinator.teardown();

    let state = end.state().clone();
    store.save(&SessionRecord::from_state(&state))?;

    if opts.json {
        println!("{}", serde_json::to_string(&state)?);
    } else {
        let reason = match &end {
            RunEnd::LimitReached(_) => "time limit reached",
            RunEnd::Stopped(_) => "stopped",
            RunEnd::Interrupted(_) => "interrupted",
            RunEnd::NotRunning(_) => "not running",
        };
        println!();
        println!("{} ({})", "Session paused".bright_yellow().bold(), reason);
        println!("  {}", render_state(&state, &config));
        println!(
            "  Resume with {}",
            "ec watch --resume".bright_cyan()
        );
    }

    Ok(())
}

fn subscribe_display(coordinator: &mut Coordinator, config: &Config, json: bool) {
    let config = config.clone();
    coordinator.subscribe(move |state: &StateSnapshot| -> anyhow::Result<TickFlow> {
        let mut out = std::io::stdout().lock();
        if json {
            writeln!(out, "{}", serde_json::to_string(state)?)?;
        } else {
            write!(out, "\r{}", render_state(state, &config))?;
            out.flush()?;
        }
        Ok(TickFlow::Continue)
    });
}

fn subscribe_autosave(coordinator: &mut Coordinator, store: SessionStore, every: u32) {
    let mut ticks: u32 = 0;
    coordinator.subscribe(move |state: &StateSnapshot| -> anyhow::Result<TickFlow> {
        ticks = ticks.wrapping_add(1);
        if ticks % every == 0 {
            store.save(&SessionRecord::from_state(state))?;
            tracing::debug!(elapsed = state.elapsed_seconds, "session autosaved");
        }
        Ok(TickFlow::Continue)
    });
}
