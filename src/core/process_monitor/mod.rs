//! Process monitoring core functionality.
//!
//! Samples the OS process table, normalizes per-process and system-wide
//! usage, filters and sorts the process list, records usage history and
//! issues control operations against single processes.

mod builder;
pub mod control;
mod history;
mod metrics;
pub mod procfs;
pub mod query;
mod session;
pub mod source;

pub use builder::SnapshotBuilder;
pub use control::{
    ControlBackend, ControlOutcome, ControlPort, ProcessSignal, SignalBackend, MAX_NICE, MIN_NICE,
};
pub use history::{RecorderState, TimeSeriesRecorder};
pub use metrics::{
    FilterCriteria, ProcessSnapshot, QueryField, Sample, SortMode, SystemTotals, TimeSeriesPoint,
};
pub use procfs::ProcFs;
pub use session::{Monitor, SampleStore};
pub use source::{ProcSource, RawProcess, SystemCounters};
