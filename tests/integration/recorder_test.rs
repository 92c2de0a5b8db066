use lpm::core::process_monitor::{RecorderState, TimeSeriesRecorder};

#[test]
fn test_three_records_at_two_second_interval() {
    let mut recorder = TimeSeriesRecorder::new(2);
    recorder.record(10.0, 40.0);
    recorder.record(20.0, 41.0);
    recorder.record(30.0, 42.0);

    let elapsed: Vec<u64> = recorder.series().iter().map(|p| p.elapsed_seconds).collect();
    assert_eq!(elapsed, vec![0, 2, 4]);
    assert_eq!(recorder.len(), 3);
    assert_eq!(recorder.state(), RecorderState::Recording);
}

#[test]
fn test_series_is_append_only() {
    let mut recorder = TimeSeriesRecorder::new(5);
    recorder.start();
    assert!(recorder.is_empty());

    let first = recorder.record(1.0, 2.0);
    recorder.record(3.0, 4.0);
    assert_eq!(recorder.series().front(), Some(&first));
    assert_eq!(recorder.latest().map(|p| p.elapsed_seconds), Some(5));
}

#[test]
fn test_bounded_recorder_keeps_newest() {
    let mut recorder = TimeSeriesRecorder::bounded(1, 10);
    for i in 0..25 {
        recorder.record(i as f64, 0.0);
    }
    assert_eq!(recorder.len(), 10);
    assert_eq!(recorder.series().front().map(|p| p.elapsed_seconds), Some(15));
    assert_eq!(recorder.latest().map(|p| p.elapsed_seconds), Some(24));
}
