//! Process monitor command handler.
//!
//! Runs the TUI dashboard, or streams samples as JSON lines for scripting.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::debug;

use crate::core::config::Config;
use crate::core::process_monitor::{Monitor, SortMode};
use crate::ui::monitor_tui::run_monitor_app;

/// Command-line overrides for one monitoring session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorOptions {
    pub interval_secs: Option<u64>,
    pub sort_mode: Option<SortMode>,
    pub json: bool,
}

impl MonitorOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let sort_mode = match matches.get_one::<String>("sort") {
            Some(value) => Some(value.parse().map_err(anyhow::Error::msg)?),
            None => None,
        };

        Ok(Self {
            interval_secs: matches.get_one::<u64>("interval").copied(),
            sort_mode,
            json: matches.get_flag("json"),
        })
    }

    /// Config for this session; the saved file is left untouched
    pub fn apply_to(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if let Some(interval) = self.interval_secs {
            config.interval_secs = interval;
        }
        if let Some(sort) = self.sort_mode {
            config.sort_mode = sort;
        }
        config
    }
}

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    run(&MonitorOptions::from_matches(matches)?)
}

/// Run with explicit options; also the default when no subcommand is given
pub fn run(options: &MonitorOptions) -> Result<()> {
    let config = options.apply_to(&Config::load()?);

    if options.json {
        return run_json_output(&config);
    }

    run_monitor_app(&config).context("Failed to run process monitor")
}

/// Run in JSON output mode (for scripting)
fn run_json_output(config: &Config) -> Result<()> {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();

    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let mut monitor = Monitor::from_config(config);
    let interval = config.interval();
    let stdout = io::stdout();

    while !stop_flag.load(Ordering::Relaxed) {
        let started = Instant::now();

        // Failed passes are logged by the monitor; keep streaming
        if let Ok(sample) = monitor.tick() {
            let mut out = stdout.lock();
            writeln!(out, "{}", serde_json::to_string(&*sample)?)?;
            out.flush()?;
        }

        while started.elapsed() < interval && !stop_flag.load(Ordering::Relaxed) {
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    debug!("json stream stopped");
    Ok(())
}
