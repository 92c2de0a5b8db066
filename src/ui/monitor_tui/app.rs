use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::{Config, ThemeMode};
use crate::core::process_monitor::{
    ControlBackend, ControlOutcome, ControlPort, FilterCriteria, Monitor, ProcFs, ProcSource,
    ProcessSnapshot, SignalBackend, SortMode, MAX_NICE, MIN_NICE,
};
use crate::ui::formatters::format_outcome;

use super::event_handler::{map_key, InputMode, MonitorEvent};
use super::render::render_ui;

/// Seconds of CPU time added or removed per threshold key press
pub const CPU_THRESHOLD_STEP: f64 = 1.0;
/// MiB added or removed per threshold key press
pub const MEM_THRESHOLD_STEP: f64 = 10.0;

/// Monitor application state
pub struct MonitorApp<S = ProcFs, B = SignalBackend> {
    pub monitor: Monitor<S>,
    pub control: ControlPort<B>,
    pub criteria: FilterCriteria,
    pub sort_mode: SortMode,
    pub theme: ThemeMode,
    /// Filtered, sorted view of the latest sample
    pub rows: Vec<ProcessSnapshot>,
    pub selected_process_index: usize,
    /// Nice value applied by `p`
    pub pending_nice: i32,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub show_chart: bool,
    pub should_quit: bool,
    pub notification: Option<String>,
    pub interval_secs: u64,
}

impl MonitorApp {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(Monitor::from_config(config), ControlPort::new(), config)
    }
}

impl<S: ProcSource, B: ControlBackend> MonitorApp<S, B> {
    pub fn with_parts(monitor: Monitor<S>, control: ControlPort<B>, config: &Config) -> Self {
        Self {
            monitor,
            control,
            criteria: FilterCriteria::default(),
            sort_mode: config.sort_mode,
            theme: config.theme,
            rows: Vec::new(),
            selected_process_index: 0,
            pending_nice: 0,
            input_mode: InputMode::Normal,
            show_help: false,
            show_chart: false,
            should_quit: false,
            notification: None,
            interval_secs: config.interval_secs(),
        }
    }

    /// Cadence tick: sample, record history and rebuild the table. A failed
    /// pass keeps the previous sample on screen; the footer reads the error
    /// from `Monitor::last_error`, which clears on the next good pass.
    pub fn update_metrics(&mut self) {
        let _ = self.monitor.tick();
        self.refresh_rows();
    }

    /// Re-sample between ticks without adding a history point
    pub fn resample(&mut self) {
        let _ = self.monitor.refresh();
        self.refresh_rows();
    }

    /// Re-run the query against the current sample
    pub fn refresh_rows(&mut self) {
        self.rows = self.monitor.query(&self.criteria, self.sort_mode);
        let max_index = self.rows.len().saturating_sub(1);
        if self.selected_process_index > max_index {
            self.selected_process_index = max_index;
        }
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.rows.get(self.selected_process_index).map(|p| p.pid)
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = !self.show_help,
            MonitorEvent::ToggleChart => self.show_chart = !self.show_chart,
            MonitorEvent::ToggleTheme => self.theme = self.theme.toggle(),
            MonitorEvent::ToggleSort => {
                self.sort_mode = self.sort_mode.toggle();
                self.refresh_rows();
            }
            MonitorEvent::ToggleQueryField => {
                self.criteria.field = self.criteria.field.toggle();
                self.refresh_rows();
            }
            MonitorEvent::BeginQuery => self.input_mode = InputMode::Query,
            MonitorEvent::QueryInput(c) => {
                self.criteria.query.push(c);
                self.refresh_rows();
            }
            MonitorEvent::QueryBackspace => {
                self.criteria.query.pop();
                self.refresh_rows();
            }
            MonitorEvent::QueryCommit => self.input_mode = InputMode::Normal,
            MonitorEvent::QueryCancel => {
                self.criteria.query.clear();
                self.input_mode = InputMode::Normal;
                self.refresh_rows();
            }
            MonitorEvent::RaiseCpuThreshold => {
                self.criteria.min_cpu_seconds += CPU_THRESHOLD_STEP;
                self.refresh_rows();
            }
            MonitorEvent::LowerCpuThreshold => {
                self.criteria.min_cpu_seconds =
                    (self.criteria.min_cpu_seconds - CPU_THRESHOLD_STEP).max(0.0);
                self.refresh_rows();
            }
            MonitorEvent::RaiseMemThreshold => {
                self.criteria.min_memory_mb += MEM_THRESHOLD_STEP;
                self.refresh_rows();
            }
            MonitorEvent::LowerMemThreshold => {
                self.criteria.min_memory_mb =
                    (self.criteria.min_memory_mb - MEM_THRESHOLD_STEP).max(0.0);
                self.refresh_rows();
            }
            MonitorEvent::SelectUp => {
                self.selected_process_index = self.selected_process_index.saturating_sub(1);
            }
            MonitorEvent::SelectDown => {
                let max_index = self.rows.len().saturating_sub(1);
                if self.selected_process_index < max_index {
                    self.selected_process_index += 1;
                }
            }
            MonitorEvent::RequestKill => {
                if let Some(pid) = self.selected_pid() {
                    self.input_mode = InputMode::ConfirmKill(pid);
                    self.notification = Some(format!("Kill PID {}? (y/n)", pid));
                }
            }
            MonitorEvent::ConfirmKill => {
                if let InputMode::ConfirmKill(pid) = self.input_mode {
                    let outcome = self.control.terminate(pid);
                    self.report("Kill", pid, outcome);
                    if outcome.is_success() {
                        self.resample();
                    }
                }
                self.input_mode = InputMode::Normal;
            }
            MonitorEvent::CancelKill => {
                self.input_mode = InputMode::Normal;
                self.notification = Some("Kill cancelled".to_string());
            }
            MonitorEvent::NiceDown => {
                self.pending_nice = (self.pending_nice - 1).max(MIN_NICE);
            }
            MonitorEvent::NiceUp => {
                self.pending_nice = (self.pending_nice + 1).min(MAX_NICE);
            }
            MonitorEvent::ApplyNice => {
                if let Some(pid) = self.selected_pid() {
                    let outcome = self.control.set_priority(pid, self.pending_nice);
                    let action = format!("Renice to {}", self.pending_nice);
                    self.report(&action, pid, outcome);
                }
            }
            MonitorEvent::Suspend => {
                if let Some(pid) = self.selected_pid() {
                    let outcome = self.control.suspend(pid);
                    self.report("Suspend", pid, outcome);
                }
            }
            MonitorEvent::Resume => {
                if let Some(pid) = self.selected_pid() {
                    let outcome = self.control.resume(pid);
                    self.report("Resume", pid, outcome);
                }
            }
            MonitorEvent::None => {}
        }
    }

    fn report(&mut self, action: &str, pid: u32, outcome: ControlOutcome) {
        self.notification = Some(format_outcome(action, pid, outcome));
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: &Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = MonitorApp::new(config);
    info!("monitor started, interval {}s", app.interval_secs);
    let result = run_loop(&mut terminal, &mut app, config.interval());

    // Restore terminal even if the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn run_loop<S: ProcSource, B: ControlBackend>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp<S, B>,
    tick_rate: Duration,
) -> Result<()> {
    app.update_metrics();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_event(map_key(key, app.input_mode));
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            app.update_metrics();
            last_tick = Instant::now();
        }
    }
}
