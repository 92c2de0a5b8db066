use lpm::core::process_monitor::{
    FilterCriteria, Monitor, ProcFs, ProcSource, SnapshotBuilder, SortMode, TimeSeriesRecorder,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_process(root: &Path, pid: u32, name: &str, utime: u64, rss_pages: u64) {
    let dir = root.join(pid.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("stat"),
        format!(
            "{} ({}) S 1 {} {} 0 -1 4194560 120 0 0 0 {} 7 0 0 20 0 1 0 5000 1000000 {} 0\n",
            pid, name, pid, pid, utime, rss_pages
        ),
    )
    .unwrap();
    fs::write(dir.join("statm"), format!("2000 {} 100 10 0 300 0\n", rss_pages)).unwrap();
    fs::write(dir.join("comm"), format!("{}\n", name)).unwrap();
}

fn write_system(root: &Path) {
    fs::write(
        root.join("stat"),
        "cpu  100 0 100 800 0 0 0 0 0 0\ncpu0 100 0 100 800 0 0 0 0 0 0\nintr 0\n",
    )
    .unwrap();
    fs::write(
        root.join("meminfo"),
        "MemTotal:           1000 kB\nMemFree:             100 kB\nMemAvailable:        250 kB\n",
    )
    .unwrap();
}

fn fake_proc() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_system(temp_dir.path());
    write_process(temp_dir.path(), 1, "init", 200, 1000);
    write_process(temp_dir.path(), 2, "worker", 50, 5000);
    temp_dir
}

#[test]
fn test_end_to_end_sample() {
    let temp_dir = fake_proc();
    let builder = SnapshotBuilder::new(ProcFs::with_units(temp_dir.path(), 100, 4096));

    let sample = builder.build().unwrap();

    let cpu: Vec<f64> = sample.processes.iter().map(|p| p.cpu_seconds).collect();
    let mem: Vec<f64> = sample.processes.iter().map(|p| p.memory_mb).collect();
    assert_eq!(cpu, vec![2.0, 0.5]);
    assert_eq!(mem, vec![3.90625, 19.53125]);

    assert_eq!(sample.totals.process_count, 2);
    assert_eq!(sample.totals.sum_process_cpu_seconds, 2.5);
    assert_eq!(sample.totals.sum_process_memory_mb, 23.4375);
    assert_eq!(sample.totals.cpu_utilization_percent, 20.0);
    assert_eq!(sample.totals.memory_utilization_percent, 75.0);
}

#[test]
fn test_end_to_end_sort_orders() {
    let temp_dir = fake_proc();
    let mut monitor = Monitor::new(
        ProcFs::with_units(temp_dir.path(), 100, 4096),
        TimeSeriesRecorder::new(2),
    );
    monitor.tick().unwrap();

    let criteria = FilterCriteria::default();
    let by_cpu: Vec<u32> = monitor
        .query(&criteria, SortMode::ByCpu)
        .iter()
        .map(|p| p.pid)
        .collect();
    let by_mem: Vec<u32> = monitor
        .query(&criteria, SortMode::ByMemory)
        .iter()
        .map(|p| p.pid)
        .collect();

    assert_eq!(by_cpu, vec![1, 2]);
    assert_eq!(by_mem, vec![2, 1]);
}

#[test]
fn test_process_without_stat_is_skipped() {
    let temp_dir = fake_proc();
    // Exited between listing and reading
    fs::create_dir_all(temp_dir.path().join("3")).unwrap();
    // Not a process directory
    fs::create_dir_all(temp_dir.path().join("self")).unwrap();

    let builder = SnapshotBuilder::new(ProcFs::with_units(temp_dir.path(), 100, 4096));
    let sample = builder.build().unwrap();

    let pids: Vec<u32> = sample.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![1, 2]);
}

#[test]
fn test_process_without_statm_is_left_out() {
    let temp_dir = fake_proc();
    write_process(temp_dir.path(), 3, "ghost", 900, 9000);
    // Exited between the stat and statm reads
    fs::remove_file(temp_dir.path().join("3").join("statm")).unwrap();

    let source = ProcFs::with_units(temp_dir.path(), 100, 4096);
    assert!(source.read_process(3).unwrap().is_none());

    let sample = SnapshotBuilder::new(source).build().unwrap();
    let pids: Vec<u32> = sample.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![1, 2]);
    assert_eq!(sample.totals.process_count, 2);
    assert_eq!(sample.totals.sum_process_cpu_seconds, 2.5);
    assert_eq!(sample.totals.sum_process_memory_mb, 23.4375);
}

#[test]
fn test_process_with_malformed_statm_is_left_out() {
    let temp_dir = fake_proc();
    write_process(temp_dir.path(), 3, "ghost", 900, 9000);
    fs::write(temp_dir.path().join("3").join("statm"), "2000\n").unwrap();

    let source = ProcFs::with_units(temp_dir.path(), 100, 4096);
    assert!(source.read_process(3).is_err());

    let sample = SnapshotBuilder::new(source).build().unwrap();
    let pids: Vec<u32> = sample.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![1, 2]);
    assert_eq!(sample.totals.sum_process_cpu_seconds, 2.5);
    assert_eq!(sample.totals.sum_process_memory_mb, 23.4375);
}

#[test]
fn test_name_with_spaces_and_parens() {
    let temp_dir = fake_proc();
    write_process(temp_dir.path(), 4, "tmux: server (1)", 10, 10);

    let source = ProcFs::with_units(temp_dir.path(), 100, 4096);
    let raw = source.read_process(4).unwrap().unwrap();
    assert_eq!(raw.name, "tmux: server (1)");
    assert_eq!(raw.cpu_ticks, 10);
    assert_eq!(raw.rss_pages, 10);
}

#[test]
fn test_missing_meminfo_fails_the_pass() {
    let temp_dir = fake_proc();
    fs::remove_file(temp_dir.path().join("meminfo")).unwrap();

    let builder = SnapshotBuilder::new(ProcFs::with_units(temp_dir.path(), 100, 4096));
    assert!(builder.build().is_err());
}

#[test]
fn test_failed_tick_keeps_previous_sample() {
    let temp_dir = fake_proc();
    let mut monitor = Monitor::new(
        ProcFs::with_units(temp_dir.path(), 100, 4096),
        TimeSeriesRecorder::new(2),
    );
    let first = monitor.tick().unwrap();

    fs::remove_file(temp_dir.path().join("stat")).unwrap();
    assert!(monitor.tick().is_err());

    let latest = monitor.latest().unwrap();
    assert_eq!(latest.timestamp, first.timestamp);
    assert_eq!(latest.totals, first.totals);
    assert_eq!(monitor.recorder().len(), 1);
}

#[test]
fn test_unreadable_root_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let source = ProcFs::with_root(temp_dir.path().join("missing"));
    assert!(source.list_pids().is_err());
}

#[cfg(target_os = "linux")]
#[test]
fn test_live_proc_contains_self() {
    let builder = SnapshotBuilder::procfs();
    let sample = builder.build().unwrap();

    let me = std::process::id();
    assert!(sample.processes.iter().any(|p| p.pid == me));
    assert!(sample.totals.cpu_utilization_percent >= 0.0);
    assert!(sample.totals.cpu_utilization_percent <= 100.0);
    assert!(sample.totals.memory_utilization_percent > 0.0);
}
