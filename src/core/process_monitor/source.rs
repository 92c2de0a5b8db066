//! Raw counter access behind a single capability.
//!
//! Every kernel read the engine performs goes through [`ProcSource`], so a
//! different process-accounting backend can be swapped in without touching
//! the query or control code.

use crate::error::Result;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Per-process counters as the OS reports them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: String,
    pub cpu_ticks: u64,
    pub rss_pages: u64,
}

/// Kernel-wide counters read once per sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemCounters {
    pub user_ticks: u64,
    pub nice_ticks: u64,
    pub system_ticks: u64,
    pub idle_ticks: u64,
    pub total_mem_kb: u64,
    pub available_mem_kb: u64,
}

impl SystemCounters {
    /// Share of all CPU ticks since boot that were not idle.
    ///
    /// This is a since-boot ratio from one reading, not a rate between two
    /// samples.
    pub fn cpu_utilization_percent(&self) -> f64 {
        let total = self.user_ticks + self.nice_ticks + self.system_ticks + self.idle_ticks;
        if total == 0 {
            return 0.0;
        }
        100.0 * total.saturating_sub(self.idle_ticks) as f64 / total as f64
    }

    /// Memory in use according to the kernel's own "available" estimate
    pub fn memory_utilization_percent(&self) -> f64 {
        if self.total_mem_kb == 0 {
            return 0.0;
        }
        let used = self.total_mem_kb.saturating_sub(self.available_mem_kb);
        100.0 * used as f64 / self.total_mem_kb as f64
    }
}

/// Source of raw process and system counters
pub trait ProcSource {
    /// All process ids currently visible to the caller
    fn list_pids(&self) -> Result<Vec<u32>>;

    /// Counters for one process, `Ok(None)` if it exited before it could be read
    fn read_process(&self, pid: u32) -> Result<Option<RawProcess>>;

    fn read_system(&self) -> Result<SystemCounters>;

    fn clock_ticks_per_second(&self) -> u64;

    fn page_size_bytes(&self) -> u64;
}

pub fn ticks_to_seconds(ticks: u64, clock_ticks_per_second: u64) -> f64 {
    if clock_ticks_per_second == 0 {
        return 0.0;
    }
    ticks as f64 / clock_ticks_per_second as f64
}

pub fn pages_to_mb(pages: u64, page_size_bytes: u64) -> f64 {
    pages as f64 * page_size_bytes as f64 / BYTES_PER_MB
}
