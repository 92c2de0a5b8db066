use lpm::commands::config::{reset, set_value};
use lpm::commands::list::{collect, ListOptions};
use lpm::core::config::{Config, ThemeMode};
use lpm::core::process_monitor::{FilterCriteria, ProcFs, SnapshotBuilder, SortMode};
use std::fs;
use tempfile::TempDir;

fn fake_proc() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("stat"), "cpu  50 0 50 900 0 0 0\n").unwrap();
    fs::write(root.join("meminfo"), "MemTotal: 2000 kB\nMemAvailable: 1000 kB\n").unwrap();

    let processes = [(10, "nginx", 300, 2560), (11, "bash", 20, 512), (12, "ssh", 900, 256)];
    for (pid, name, utime, rss) in processes {
        let dir = root.join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("stat"),
            format!("{} ({}) S 1 1 1 0 -1 0 0 0 0 0 {} 0 0 0 20 0\n", pid, name, utime),
        )
        .unwrap();
        fs::write(dir.join("statm"), format!("4000 {} 0 0 0 0 0\n", rss)).unwrap();
    }
    temp_dir
}

#[test]
fn test_list_collect_filters_sorts_and_limits() {
    let temp_dir = fake_proc();
    let builder = SnapshotBuilder::new(ProcFs::with_units(temp_dir.path(), 100, 4096));

    let options = ListOptions {
        criteria: FilterCriteria {
            min_memory_mb: 1.0,
            ..Default::default()
        },
        sort_mode: SortMode::ByMemory,
        limit: Some(1),
        json: true,
    };
    let report = collect(&builder, &options).unwrap();

    // Totals describe the whole table, not the filtered rows
    assert_eq!(report.totals.process_count, 3);
    assert_eq!(report.totals.cpu_utilization_percent, 10.0);
    assert_eq!(report.totals.memory_utilization_percent, 50.0);

    let pids: Vec<u32> = report.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![10]);
    assert_eq!(report.processes[0].memory_mb, 10.0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["processes"][0]["name"], "nginx");
}

#[test]
fn test_list_collect_by_cpu() {
    let temp_dir = fake_proc();
    let builder = SnapshotBuilder::new(ProcFs::with_units(temp_dir.path(), 100, 4096));

    let options = ListOptions {
        criteria: FilterCriteria {
            query: "SH".to_string(),
            ..Default::default()
        },
        sort_mode: SortMode::ByCpu,
        limit: None,
        json: false,
    };
    let report = collect(&builder, &options).unwrap();

    let names: Vec<&str> = report.processes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["ssh", "bash"]);
}

#[test]
fn test_config_set_and_reset_persist() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lpm").join("config.json");

    set_value(&path, "theme", "dark").unwrap();
    let config = set_value(&path, "interval", "4").unwrap();
    assert_eq!(config.theme, ThemeMode::Dark);
    assert_eq!(config.interval_secs(), 4);
    assert_eq!(Config::load_from(&path).unwrap(), config);

    assert!(set_value(&path, "interval", "0").is_err());
    assert_eq!(Config::load_from(&path).unwrap().interval_secs(), 4);

    reset(&path).unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}
