//! Terminal User Interface for process monitoring.
//!
//! Provides a real-time process table and usage history using ratatui.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_monitor_app, MonitorApp, CPU_THRESHOLD_STEP, MEM_THRESHOLD_STEP};
pub use event_handler::{map_key, InputMode, MonitorEvent};
pub use widgets::Theme;
