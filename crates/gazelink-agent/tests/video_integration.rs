//! Integration tests for the video ingestion channel.
//!
//! The camera, detector and pointer are in-memory stand-ins; the decoder,
//! actuator and capture loop are the real ones.  The detector is driven by
//! `mockall` so each test states exactly what the "vision library" reports.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gazelink_agent::application::actuate_pointer::{PointerActuator, PointerDriver};
use gazelink_agent::application::status::{drain, StatusReceiver, StatusSink};
use gazelink_agent::application::video_ingest::{probe_devices, FrameSink, VideoIngest, VideoSettings};
use gazelink_agent::infrastructure::pointer::mock::MockPointerDriver;
use gazelink_agent::infrastructure::video::mock::MockVideoOpener;
use gazelink_agent::infrastructure::video::HeadlessFrameSink;
use gazelink_core::marker::code::coordinates_to_ids;
use gazelink_core::{
    DetectError, MarkerDecoder, MarkerDetector, MarkerDictionary, MarkerObservation, ScreenSize,
};
use image::RgbImage;
use mockall::mock;

mock! {
    Detector {}

    impl MarkerDetector for Detector {
        fn dictionary(&self) -> MarkerDictionary;
        fn detect(&self, frame: &RgbImage) -> Result<Vec<MarkerObservation>, DetectError>;
    }
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn markers_for(x: u32, y: u32) -> Vec<MarkerObservation> {
    let ids = coordinates_to_ids(x, y).expect("encodable");
    // Reported right to left; the decoder must restore screen order.
    ids.iter()
        .enumerate()
        .rev()
        .map(|(i, id)| MarkerObservation::new(100.0 + i as f32 * 80.0, *id))
        .collect()
}

struct Rig {
    ingest: VideoIngest,
    opener: Arc<MockVideoOpener>,
    driver: Arc<MockPointerDriver>,
    sink: Arc<HeadlessFrameSink>,
    rx: StatusReceiver,
}

fn rig(detector: MockDetector, frames: u32) -> Rig {
    let opener = Arc::new(MockVideoOpener::new(&[0, 1], frames));
    let driver = Arc::new(MockPointerDriver::new(ScreenSize::new(1920, 1080)));
    let sink = Arc::new(HeadlessFrameSink::new());
    let (status, rx) = StatusSink::channel();
    let ingest = VideoIngest::new(
        Arc::clone(&opener) as _,
        Arc::new(MarkerDecoder::new(Arc::new(detector))),
        Arc::new(PointerActuator::new(Arc::clone(&driver) as Arc<dyn PointerDriver>)),
        Arc::clone(&sink) as Arc<dyn FrameSink>,
        status,
    )
    .with_settings(VideoSettings {
        resolution: (1920, 1080),
        frame_interval: Duration::from_millis(1),
    });
    Rig {
        ingest,
        opener,
        driver,
        sink,
        rx,
    }
}

fn wait_until(condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(1));
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

#[test]
fn test_four_markers_move_pointer_to_decoded_target_once_per_frame() {
    // Arrange
    let mut detector = MockDetector::new();
    detector
        .expect_detect()
        .times(2)
        .returning(|_| Ok(markers_for(1024, 768)));
    let rig = rig(detector, 2);

    // Act
    let capture = rig.ingest.start(0).expect("start");
    wait_until(|| rig.sink.frames() == 2);
    rig.ingest.stop();
    capture.join().unwrap();

    // Assert
    assert_eq!(
        rig.driver.moves(),
        vec![
            (1024, 768, Duration::from_millis(700)),
            (1024, 768, Duration::from_millis(700))
        ]
    );
}

#[test]
fn test_frames_without_exactly_four_markers_do_not_move() {
    // Arrange – empty, three markers, five markers
    let mut detector = MockDetector::new();
    let mut sequence = mockall::Sequence::new();
    detector
        .expect_detect()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(Vec::new()));
    detector
        .expect_detect()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(markers_for(10, 20)[..3].to_vec()));
    detector
        .expect_detect()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| {
            let mut five = markers_for(10, 20);
            five.push(MarkerObservation::new(900.0, 7));
            Ok(five)
        });
    let rig = rig(detector, 3);

    // Act
    let capture = rig.ingest.start(0).expect("start");
    wait_until(|| rig.sink.frames() == 3);
    rig.ingest.stop();
    capture.join().unwrap();

    // Assert
    assert!(rig.driver.moves().is_empty());
}

#[test]
fn test_detector_failure_is_treated_as_no_markers() {
    let mut detector = MockDetector::new();
    detector
        .expect_detect()
        .times(1)
        .returning(|_| Err(DetectError::Backend("model not loaded".to_string())));
    let rig = rig(detector, 1);

    let capture = rig.ingest.start(0).expect("start");
    wait_until(|| rig.sink.frames() == 1);
    rig.ingest.stop();
    capture.join().unwrap();

    assert!(rig.driver.moves().is_empty());
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn test_start_reports_open_and_stop_reports_end() {
    // Arrange
    let mut rig = rig(MockDetector::new(), 0);

    // Act
    let capture = rig.ingest.start(1).expect("start");
    assert!(rig.ingest.is_running());
    rig.ingest.stop();
    rig.ingest.stop();
    capture.join().unwrap();

    // Assert
    let texts: Vec<String> = drain(&mut rig.rx).into_iter().map(|m| m.text).collect();
    assert_eq!(
        texts,
        vec!["Opened video device mock camera 1", "End video capture from mock camera 1"]
    );
    assert!(rig.opener.opened()[0].is_released());
    assert!(!rig.ingest.is_running());
}

#[test]
fn test_failed_open_reports_error() {
    let mut rig = rig(MockDetector::new(), 0);

    let result = rig.ingest.start(5);

    assert!(result.is_err());
    let messages = drain(&mut rig.rx);
    assert_eq!(
        messages[0].text,
        "Failed to open video device: mock camera 5: no such device"
    );
}

#[test]
fn test_transient_read_failures_keep_the_loop_alive() {
    // Arrange – zero frames: every read is a transient failure
    let rig = rig(MockDetector::new(), 0);

    // Act
    let capture = rig.ingest.start(0).expect("start");
    let source = rig.opener.opened()[0].clone();
    wait_until(|| source.reads() >= 3);
    let running = rig.ingest.is_running();
    rig.ingest.stop();
    capture.join().unwrap();

    // Assert
    assert!(source.reads() >= 3);
    assert!(running);
}

#[test]
fn test_probe_devices_finds_openable_indices() {
    let opener = MockVideoOpener::new(&[0, 3], 1);

    let found = probe_devices(&opener, 10, (1920, 1080));

    assert_eq!(found, vec![0, 3]);
    assert!(opener.opened().iter().all(|s| s.is_released()));
}
