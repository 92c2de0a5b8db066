// LPM Library - Public API

// Re-export error types
pub mod error;
pub use error::{LpmError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;

// Initialize logging. Defaults to `warn` so records stay out of the TUI;
// RUST_LOG overrides it.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
