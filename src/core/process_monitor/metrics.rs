use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One process's state at sample time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    /// Cumulative CPU time since process start, not a rate
    pub cpu_seconds: f64,
    /// Resident set size in MiB
    pub memory_mb: f64,
}

/// Aggregate counters for one sample.
///
/// The two sums are diagnostic totals over the sampled processes. The two
/// percentages come from kernel-wide counters and are independent of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemTotals {
    pub sum_process_cpu_seconds: f64,
    pub sum_process_memory_mb: f64,
    pub cpu_utilization_percent: f64,
    pub memory_utilization_percent: f64,
    pub process_count: usize,
}

/// A fully built sampling pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: i64, // Unix timestamp
    pub processes: Vec<ProcessSnapshot>,
    pub totals: SystemTotals,
}

/// Which snapshot field a text query is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryField {
    #[default]
    Name,
    Pid,
}

impl QueryField {
    pub fn toggle(self) -> Self {
        match self {
            QueryField::Name => QueryField::Pid,
            QueryField::Pid => QueryField::Name,
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryField::Name => write!(f, "Name"),
            QueryField::Pid => write!(f, "PID"),
        }
    }
}

impl FromStr for QueryField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(QueryField::Name),
            "pid" => Ok(QueryField::Pid),
            other => Err(format!("unknown query field '{}' (expected name or pid)", other)),
        }
    }
}

/// Filter parameters supplied by the front end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    pub field: QueryField,
    pub min_cpu_seconds: f64,
    pub min_memory_mb: f64,
}

/// Sort order for the process list, always descending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    ByCpu,
    ByMemory,
}

impl SortMode {
    pub fn toggle(self) -> Self {
        match self {
            SortMode::ByCpu => SortMode::ByMemory,
            SortMode::ByMemory => SortMode::ByCpu,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::ByCpu => write!(f, "cpu"),
            SortMode::ByMemory => write!(f, "memory"),
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(SortMode::ByCpu),
            "mem" | "memory" => Ok(SortMode::ByMemory),
            other => Err(format!("unknown sort mode '{}' (expected cpu or memory)", other)),
        }
    }
}

/// One point of the system-wide usage history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub elapsed_seconds: u64,
    pub cpu_percent: f64,
    pub mem_percent: f64,
}
