use lpm::core::process_monitor::query::apply;
use lpm::core::process_monitor::{FilterCriteria, ProcessSnapshot, QueryField, SortMode};

fn snap(pid: u32, name: &str, cpu: f64, mem: f64) -> ProcessSnapshot {
    ProcessSnapshot {
        pid,
        name: name.to_string(),
        cpu_seconds: cpu,
        memory_mb: mem,
    }
}

fn table() -> Vec<ProcessSnapshot> {
    vec![
        snap(1, "systemd", 12.0, 9.5),
        snap(123, "bash", 0.4, 4.0),
        snap(1234, "Shell", 3.0, 80.0),
        snap(77, "sshd", 3.0, 6.0),
        snap(500, "firefox", 950.0, 1200.0),
    ]
}

fn pids(rows: &[ProcessSnapshot]) -> Vec<u32> {
    rows.iter().map(|p| p.pid).collect()
}

#[test]
fn test_empty_criteria_keeps_everything() {
    let rows = apply(&table(), &FilterCriteria::default(), SortMode::ByCpu);
    assert_eq!(rows.len(), table().len());
}

#[test]
fn test_sorted_output_is_monotonic() {
    let by_cpu = apply(&table(), &FilterCriteria::default(), SortMode::ByCpu);
    assert!(by_cpu.windows(2).all(|w| w[0].cpu_seconds >= w[1].cpu_seconds));

    let by_mem = apply(&table(), &FilterCriteria::default(), SortMode::ByMemory);
    assert!(by_mem.windows(2).all(|w| w[0].memory_mb >= w[1].memory_mb));
}

#[test]
fn test_equal_keys_keep_input_order() {
    let rows = apply(&table(), &FilterCriteria::default(), SortMode::ByCpu);
    // Shell and sshd tie at 3.0 s
    assert_eq!(pids(&rows), vec![500, 1, 1234, 77, 123]);
}

#[test]
fn test_name_query_is_case_insensitive_substring() {
    let criteria = FilterCriteria {
        query: "sh".to_string(),
        ..Default::default()
    };
    let rows = apply(&table(), &criteria, SortMode::ByMemory);
    assert_eq!(pids(&rows), vec![1234, 77, 123]);
}

#[test]
fn test_pid_query_is_exact() {
    let criteria = FilterCriteria {
        query: " 123 ".to_string(),
        field: QueryField::Pid,
        ..Default::default()
    };
    let rows = apply(&table(), &criteria, SortMode::ByCpu);
    assert_eq!(pids(&rows), vec![123]);
}

#[test]
fn test_thresholds_are_inclusive_and_combined() {
    let criteria = FilterCriteria {
        min_cpu_seconds: 3.0,
        min_memory_mb: 9.5,
        ..Default::default()
    };
    let rows = apply(&table(), &criteria, SortMode::ByCpu);
    assert_eq!(pids(&rows), vec![500, 1, 1234]);
}

#[test]
fn test_input_is_not_modified() {
    let input = table();
    let criteria = FilterCriteria {
        query: "fire".to_string(),
        ..Default::default()
    };
    let _ = apply(&input, &criteria, SortMode::ByMemory);
    assert_eq!(input, table());
}
