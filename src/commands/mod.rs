// Command handlers module
pub mod config;
pub mod control;
pub mod list;
pub mod monitor;

// Re-exports for cleaner imports
pub use list::execute as list;
pub use monitor::execute as monitor;
