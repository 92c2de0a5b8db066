use log::{debug, trace};

use super::metrics::{ProcessSnapshot, Sample, SystemTotals};
use super::procfs::ProcFs;
use super::source::{pages_to_mb, ticks_to_seconds, ProcSource, RawProcess};
use crate::error::Result;

/// Builds one consistent [`Sample`] per call from a [`ProcSource`]
pub struct SnapshotBuilder<S> {
    source: S,
}

impl SnapshotBuilder<ProcFs> {
    /// Builder over the live `/proc`
    pub fn procfs() -> Self {
        Self::new(ProcFs::new())
    }
}

impl<S: ProcSource> SnapshotBuilder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one full sampling pass.
    ///
    /// Processes that exit mid-scan or cannot be read are left out of the
    /// sample. Only an unreadable process table or unreadable kernel-wide
    /// counters fail the pass.
    pub fn build(&self) -> Result<Sample> {
        let pids = self.source.list_pids()?;
        let clock_ticks = self.source.clock_ticks_per_second();
        let page_size = self.source.page_size_bytes();

        let mut processes = Vec::with_capacity(pids.len());
        let mut sum_cpu = 0.0;
        let mut sum_memory = 0.0;

        for pid in pids {
            let raw = match self.source.read_process(pid) {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    trace!("pid {} exited during scan", pid);
                    continue;
                }
                Err(e) => {
                    debug!("skipping pid {}: {}", pid, e);
                    continue;
                }
            };

            let snapshot = normalize(raw, clock_ticks, page_size);
            sum_cpu += snapshot.cpu_seconds;
            sum_memory += snapshot.memory_mb;
            processes.push(snapshot);
        }

        let counters = self.source.read_system()?;

        let totals = SystemTotals {
            sum_process_cpu_seconds: sum_cpu,
            sum_process_memory_mb: sum_memory,
            cpu_utilization_percent: counters.cpu_utilization_percent(),
            memory_utilization_percent: counters.memory_utilization_percent(),
            process_count: processes.len(),
        };

        Ok(Sample {
            timestamp: chrono::Utc::now().timestamp(),
            processes,
            totals,
        })
    }
}

fn normalize(raw: RawProcess, clock_ticks: u64, page_size: u64) -> ProcessSnapshot {
    ProcessSnapshot {
        pid: raw.pid,
        name: raw.name,
        cpu_seconds: ticks_to_seconds(raw.cpu_ticks, clock_ticks),
        memory_mb: pages_to_mb(raw.rss_pages, page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::process_monitor::source::SystemCounters;
    use crate::error::LpmError;
    use std::collections::HashMap;

    /// In-memory source; pids listed without an entry behave as exited
    struct StaticSource {
        listed: Vec<u32>,
        processes: HashMap<u32, std::result::Result<RawProcess, String>>,
        system: Option<SystemCounters>,
    }

    impl ProcSource for StaticSource {
        fn list_pids(&self) -> Result<Vec<u32>> {
            Ok(self.listed.clone())
        }

        fn read_process(&self, pid: u32) -> Result<Option<RawProcess>> {
            match self.processes.get(&pid) {
                None => Ok(None),
                Some(Ok(raw)) => Ok(Some(raw.clone())),
                Some(Err(msg)) => Err(LpmError::permission_denied(msg.clone())),
            }
        }

        fn read_system(&self) -> Result<SystemCounters> {
            self.system
                .ok_or_else(|| LpmError::system_counters("no counters"))
        }

        fn clock_ticks_per_second(&self) -> u64 {
            100
        }

        fn page_size_bytes(&self) -> u64 {
            4096
        }
    }

    fn raw(pid: u32, name: &str, cpu_ticks: u64, rss_pages: u64) -> RawProcess {
        RawProcess {
            pid,
            name: name.to_string(),
            cpu_ticks,
            rss_pages,
        }
    }

    fn counters() -> SystemCounters {
        SystemCounters {
            user_ticks: 60,
            nice_ticks: 0,
            system_ticks: 20,
            idle_ticks: 120,
            total_mem_kb: 1000,
            available_mem_kb: 250,
        }
    }

    #[test]
    fn test_build_normalizes_and_sums() {
        let source = StaticSource {
            listed: vec![1, 2],
            processes: HashMap::from([
                (1, Ok(raw(1, "init", 200, 1000))),
                (2, Ok(raw(2, "worker", 50, 5000))),
            ]),
            system: Some(counters()),
        };

        let sample = SnapshotBuilder::new(source).build().unwrap();
        assert_eq!(sample.processes.len(), 2);
        assert_eq!(sample.processes[0].cpu_seconds, 2.0);
        assert_eq!(sample.processes[1].memory_mb, 19.53125);
        assert_eq!(sample.totals.sum_process_cpu_seconds, 2.5);
        assert_eq!(sample.totals.sum_process_memory_mb, 3.90625 + 19.53125);
        assert_eq!(sample.totals.process_count, 2);
        assert!((sample.totals.cpu_utilization_percent - 40.0).abs() < 1e-9);
        assert!((sample.totals.memory_utilization_percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_exited_and_denied_processes_are_skipped() {
        let source = StaticSource {
            listed: vec![1, 2, 3],
            processes: HashMap::from([
                (1, Ok(raw(1, "init", 10, 10))),
                (3, Err("pid 3".to_string())),
            ]),
            system: Some(counters()),
        };

        let sample = SnapshotBuilder::new(source).build().unwrap();
        let pids: Vec<u32> = sample.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1]);
        assert_eq!(sample.totals.process_count, 1);
        assert_eq!(sample.totals.sum_process_cpu_seconds, 0.1);
    }

    #[test]
    fn test_unreadable_system_counters_fail_the_sample() {
        let source = StaticSource {
            listed: vec![1],
            processes: HashMap::from([(1, Ok(raw(1, "init", 10, 10)))]),
            system: None,
        };

        let err = SnapshotBuilder::new(source).build().unwrap_err();
        assert!(matches!(err, LpmError::SystemCounters(_)));
    }
}
