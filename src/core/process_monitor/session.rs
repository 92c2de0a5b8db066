//! Tick entry point shared by the front ends.
//!
//! A [`Monitor`] runs one sampling pass per tick, publishes it whole through
//! a [`SampleStore`] and feeds its totals to the history recorder.

use std::sync::Arc;

use log::warn;
use parking_lot::RwLock;

use super::builder::SnapshotBuilder;
use super::history::TimeSeriesRecorder;
use super::metrics::{FilterCriteria, ProcessSnapshot, Sample, SortMode};
use super::procfs::ProcFs;
use super::query;
use super::source::ProcSource;
use crate::core::config::Config;
use crate::error::Result;

/// Latest fully built sample, swapped in as a whole
#[derive(Debug, Default)]
pub struct SampleStore {
    latest: RwLock<Option<Arc<Sample>>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, sample: Sample) -> Arc<Sample> {
        let sample = Arc::new(sample);
        *self.latest.write() = Some(Arc::clone(&sample));
        sample
    }

    pub fn latest(&self) -> Option<Arc<Sample>> {
        self.latest.read().clone()
    }
}

pub struct Monitor<S = ProcFs> {
    builder: SnapshotBuilder<S>,
    store: Arc<SampleStore>,
    recorder: TimeSeriesRecorder,
    last_error: Option<String>,
}

impl Monitor<ProcFs> {
    /// Monitor over the live `/proc` using the configured cadence and history size
    pub fn from_config(config: &Config) -> Self {
        let interval = config.interval_secs();
        let recorder = match config.history_capacity {
            Some(capacity) => TimeSeriesRecorder::bounded(interval, capacity),
            None => TimeSeriesRecorder::new(interval),
        };
        Self::new(ProcFs::new(), recorder)
    }
}

impl<S: ProcSource> Monitor<S> {
    pub fn new(source: S, recorder: TimeSeriesRecorder) -> Self {
        Self {
            builder: SnapshotBuilder::new(source),
            store: Arc::new(SampleStore::new()),
            recorder,
            last_error: None,
        }
    }

    /// Sample once.
    ///
    /// On failure the previously published sample stays current and no
    /// history point is recorded.
    pub fn tick(&mut self) -> Result<Arc<Sample>> {
        let sample = self.refresh()?;
        self.recorder.record(
            sample.totals.cpu_utilization_percent,
            sample.totals.memory_utilization_percent,
        );
        Ok(sample)
    }

    /// Rebuild and publish the sample outside the cadence, e.g. after a kill.
    /// The recorder is left untouched.
    pub fn refresh(&mut self) -> Result<Arc<Sample>> {
        match self.builder.build() {
            Ok(sample) => {
                self.last_error = None;
                Ok(self.store.publish(sample))
            }
            Err(e) => {
                warn!("sampling failed, keeping previous sample: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn latest(&self) -> Option<Arc<Sample>> {
        self.store.latest()
    }

    /// Shared handle for readers on other threads
    pub fn store(&self) -> Arc<SampleStore> {
        Arc::clone(&self.store)
    }

    pub fn source(&self) -> &S {
        self.builder.source()
    }

    pub fn recorder(&self) -> &TimeSeriesRecorder {
        &self.recorder
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Filtered, sorted view of the latest sample (empty before the first tick)
    pub fn query(&self, criteria: &FilterCriteria, sort: SortMode) -> Vec<ProcessSnapshot> {
        self.latest()
            .map(|sample| query::apply(&sample.processes, criteria, sort))
            .unwrap_or_default()
    }
}
