use std::collections::VecDeque;

use super::metrics::TimeSeriesPoint;

/// Whether the recorder has been activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// System-wide CPU/memory history for charts.
///
/// Elapsed time is a logical counter advanced by the sampling interval on
/// every record, not a clock read. The default recorder keeps every point
/// for the life of the session; [`TimeSeriesRecorder::bounded`] keeps only
/// the newest `capacity` points.
#[derive(Debug, Clone)]
pub struct TimeSeriesRecorder {
    state: RecorderState,
    interval_secs: u64,
    next_elapsed: u64,
    capacity: Option<usize>,
    points: VecDeque<TimeSeriesPoint>,
}

impl TimeSeriesRecorder {
    /// Unbounded recorder advancing `interval_secs` per point
    pub fn new(interval_secs: u64) -> Self {
        Self {
            state: RecorderState::Idle,
            interval_secs,
            next_elapsed: 0,
            capacity: None,
            points: VecDeque::new(),
        }
    }

    /// Ring-buffer recorder that evicts the oldest point past `capacity`
    pub fn bounded(interval_secs: u64, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            points: VecDeque::with_capacity(capacity.max(1)),
            ..Self::new(interval_secs)
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Begin recording. Once started the recorder never returns to idle.
    pub fn start(&mut self) {
        self.state = RecorderState::Recording;
    }

    /// Append one point; the first call also activates the recorder
    pub fn record(&mut self, cpu_percent: f64, mem_percent: f64) -> TimeSeriesPoint {
        self.start();

        let point = TimeSeriesPoint {
            elapsed_seconds: self.next_elapsed,
            cpu_percent,
            mem_percent,
        };
        self.next_elapsed += self.interval_secs;

        if let Some(capacity) = self.capacity {
            if self.points.len() >= capacity {
                self.points.pop_front();
            }
        }
        self.points.push_back(point);
        point
    }

    /// Recorded points, oldest first
    pub fn series(&self) -> &VecDeque<TimeSeriesPoint> {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&TimeSeriesPoint> {
        self.points.back()
    }

    /// `(elapsed, cpu%)` pairs for chart datasets
    pub fn cpu_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.elapsed_seconds as f64, p.cpu_percent))
            .collect()
    }

    /// `(elapsed, mem%)` pairs for chart datasets
    pub fn memory_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.elapsed_seconds as f64, p.mem_percent))
            .collect()
    }
}
