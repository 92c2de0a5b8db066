//! Filtering and sorting of a process list.

use std::cmp::Ordering;

use super::metrics::{FilterCriteria, ProcessSnapshot, QueryField, SortMode};

/// Filter `snapshots` by `criteria` and order them by `sort`, descending.
///
/// Threshold and text filters are ANDed. Ties keep their input order.
pub fn apply(
    snapshots: &[ProcessSnapshot],
    criteria: &FilterCriteria,
    sort: SortMode,
) -> Vec<ProcessSnapshot> {
    let query = criteria.query.trim();
    let needle = query.to_lowercase();

    let mut result: Vec<ProcessSnapshot> = snapshots
        .iter()
        .filter(|p| meets_thresholds(p, criteria))
        .filter(|p| query.is_empty() || matches_query(p, criteria.field, query, &needle))
        .cloned()
        .collect();

    sort_snapshots(&mut result, sort);
    result
}

/// Stable descending sort on the selected key
pub fn sort_snapshots(snapshots: &mut [ProcessSnapshot], sort: SortMode) {
    let key = |p: &ProcessSnapshot| match sort {
        SortMode::ByCpu => p.cpu_seconds,
        SortMode::ByMemory => p.memory_mb,
    };
    snapshots.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

fn meets_thresholds(p: &ProcessSnapshot, criteria: &FilterCriteria) -> bool {
    p.cpu_seconds >= criteria.min_cpu_seconds && p.memory_mb >= criteria.min_memory_mb
}

fn matches_query(p: &ProcessSnapshot, field: QueryField, query: &str, needle: &str) -> bool {
    match field {
        QueryField::Name => p.name.to_lowercase().contains(needle),
        QueryField::Pid => p.pid.to_string() == query,
    }
}
