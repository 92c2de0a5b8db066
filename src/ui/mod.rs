// UI and formatting module

pub mod formatters;
pub mod monitor_tui;
pub mod prompts;

// Re-export commonly used items for cleaner imports
pub use formatters::{
    format_cpu_time, format_memory_mb, format_outcome, format_percent, format_timestamp,
};
pub use prompts::{confirm, info, success};
