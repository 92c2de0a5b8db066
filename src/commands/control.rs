use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;

use crate::core::process_monitor::{
    ControlBackend, ControlOutcome, ControlPort, ProcFs, ProcSource,
};
use crate::ui::formatters::format_outcome;
use crate::ui::prompts::{confirm, info, success};

/// A single control request from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Kill,
    Renice(i32),
    Stop,
    Continue,
}

impl ControlAction {
    pub fn label(&self) -> String {
        match self {
            ControlAction::Kill => "Kill".to_string(),
            ControlAction::Renice(nice) => format!("Renice to {}", nice),
            ControlAction::Stop => "Stop".to_string(),
            ControlAction::Continue => "Continue".to_string(),
        }
    }
}

/// Dispatch `action` to the control port
pub fn perform<B: ControlBackend>(
    port: &ControlPort<B>,
    action: ControlAction,
    pid: u32,
) -> ControlOutcome {
    match action {
        ControlAction::Kill => port.terminate(pid),
        ControlAction::Renice(nice) => port.set_priority(pid, nice),
        ControlAction::Stop => port.suspend(pid),
        ControlAction::Continue => port.resume(pid),
    }
}

pub fn execute_kill(matches: &ArgMatches) -> Result<()> {
    let pid = pid_arg(matches)?;

    if !matches.get_flag("yes") {
        let name = ProcFs::new()
            .read_process(pid)
            .ok()
            .flatten()
            .map(|p| p.name)
            .unwrap_or_else(|| "unknown".to_string());

        let prompt = format!("Kill PID {} ({})? [y/N]", pid, name);
        if !confirm(&prompt).context("Failed to read confirmation")? {
            info("Cancelled.");
            return Ok(());
        }
    }

    run(ControlAction::Kill, pid)
}

pub fn execute_renice(matches: &ArgMatches) -> Result<()> {
    let pid = pid_arg(matches)?;
    let nice = *matches
        .get_one::<i32>("nice")
        .context("Nice value is required")?;
    run(ControlAction::Renice(nice), pid)
}

pub fn execute_stop(matches: &ArgMatches) -> Result<()> {
    run(ControlAction::Stop, pid_arg(matches)?)
}

pub fn execute_cont(matches: &ArgMatches) -> Result<()> {
    run(ControlAction::Continue, pid_arg(matches)?)
}

fn pid_arg(matches: &ArgMatches) -> Result<u32> {
    matches
        .get_one::<u32>("pid")
        .copied()
        .context("PID is required")
}

fn run(action: ControlAction, pid: u32) -> Result<()> {
    let outcome = perform(&ControlPort::new(), action, pid);
    let message = format_outcome(&action.label(), pid, outcome);

    if outcome.is_success() {
        success(&message);
        Ok(())
    } else {
        Err(anyhow!(message))
    }
}
