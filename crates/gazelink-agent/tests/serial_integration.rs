//! Integration tests for the serial ingestion channel.
//!
//! # Purpose
//!
//! These tests wire `SerialIngest` exactly as the binary does (parser →
//! `PointerActions` → `PointerActuator` → driver) but swap the OS adapters
//! for the in-memory mocks from `infrastructure`.  They verify:
//!
//! - The happy path: a coordinate line is reported and moves the pointer at
//!   the serial speed.
//! - Malformed input: unknown lines and wrong pair counts produce an error
//!   status and no movement, and the loop keeps reading.
//! - Lifecycle: failed opens, reconnects and repeated disconnects.
//!
//! The reader thread may finish the iteration it is in after a disconnect,
//! so assertions wait on observable effects instead of fixed sleeps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gazelink_agent::application::actuate_pointer::{PointerActuator, PointerDriver};
use gazelink_agent::application::command_actions::{CalibrationIndicator, PointerActions};
use gazelink_agent::application::serial_ingest::SerialIngest;
use gazelink_agent::application::status::{drain, Severity, StatusMessage, StatusReceiver, StatusSink};
use gazelink_agent::infrastructure::calibration::MockCalibrationIndicator;
use gazelink_agent::infrastructure::pointer::mock::MockPointerDriver;
use gazelink_agent::infrastructure::serial::mock::MockSerialOpener;
use gazelink_core::ScreenSize;

// ── Fixtures ──────────────────────────────────────────────────────────────────

struct Rig {
    ingest: SerialIngest,
    opener: Arc<MockSerialOpener>,
    driver: Arc<MockPointerDriver>,
    indicator: Arc<MockCalibrationIndicator>,
    rx: StatusReceiver,
    seen: Vec<StatusMessage>,
}

impl Rig {
    fn new(opener: MockSerialOpener) -> Self {
        let opener = Arc::new(opener);
        let driver = Arc::new(MockPointerDriver::new(ScreenSize::new(1920, 1080)));
        let indicator = Arc::new(MockCalibrationIndicator::new());
        let actuator = Arc::new(PointerActuator::new(
            Arc::clone(&driver) as Arc<dyn PointerDriver>
        ));
        let actions = Arc::new(PointerActions::new(
            actuator,
            Arc::clone(&indicator) as Arc<dyn CalibrationIndicator>,
        ));
        let (status, rx) = StatusSink::channel();
        let ingest = SerialIngest::new(Arc::clone(&opener) as _, actions, status)
            .with_poll_interval(Duration::from_millis(1));
        Self {
            ingest,
            opener,
            driver,
            indicator,
            rx,
            seen: Vec::new(),
        }
    }

    /// Collects status messages until `count` have been seen in total.
    fn wait_for_messages(&mut self, count: usize) -> &[StatusMessage] {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.seen.len() < count && Instant::now() < deadline {
            self.seen.extend(drain(&mut self.rx));
            std::thread::sleep(Duration::from_millis(1));
        }
        &self.seen
    }

    fn texts(&self) -> Vec<&str> {
        self.seen.iter().map(|m| m.text.as_str()).collect()
    }
}

// ── Happy path ────────────────────────────────────────────────────────────────

#[test]
fn test_coordinate_line_moves_pointer_at_serial_speed() {
    // Arrange
    let mut rig = Rig::new(MockSerialOpener::with_script(&["[100,200]"]));

    // Act
    let reader = rig.ingest.connect("COM8", 9600).expect("connect");
    rig.wait_for_messages(3);
    rig.ingest.disconnect();
    reader.join().unwrap();

    // Assert
    assert_eq!(
        &rig.texts()[..3],
        &[
            "Connected to COM8",
            "Received data from COM8: [100,200]",
            "moved pointer to (100, 200)"
        ]
    );
    assert_eq!(rig.driver.moves(), vec![(100, 200, Duration::from_millis(200))]);
}

#[test]
fn test_calibration_tokens_toggle_indicator() {
    let mut rig = Rig::new(MockSerialOpener::with_script(&[
        "calibration_required",
        "calibration_done",
    ]));

    let reader = rig.ingest.connect("COM8", 9600).expect("connect");
    rig.wait_for_messages(5);
    rig.ingest.disconnect();
    reader.join().unwrap();

    assert_eq!(rig.indicator.shows(), 1);
    assert_eq!(rig.indicator.hides(), 1);
    assert!(rig.driver.moves().is_empty());
    assert!(rig
        .texts()
        .contains(&"calibration_required: showing calibration dot"));
}

// ── Malformed input ───────────────────────────────────────────────────────────

#[test]
fn test_unknown_line_reports_error_without_moving() {
    // Arrange
    let mut rig = Rig::new(MockSerialOpener::with_script(&["invalid_data"]));

    // Act
    let reader = rig.ingest.connect("COM8", 9600).expect("connect");
    rig.wait_for_messages(3);
    rig.ingest.disconnect();
    reader.join().unwrap();

    // Assert
    let received: Vec<_> = rig
        .seen
        .iter()
        .filter(|m| m.text.starts_with("Received data from"))
        .collect();
    let errors: Vec<_> = rig
        .seen
        .iter()
        .filter(|m| m.severity == Severity::Error)
        .collect();
    assert_eq!(received.len(), 1);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].text,
        "ERROR: error parsing above line, invalid data, error is: Unknown command: invalid_data"
    );
    assert!(rig.driver.moves().is_empty());
}

#[test]
fn test_bad_lines_do_not_stop_the_reader() {
    // Arrange – an over-long pair and an out-of-range pair before a valid one
    let mut rig = Rig::new(MockSerialOpener::with_script(&[
        "123,456,789",
        "[5000,10]",
        "(10, 20)",
    ]));

    // Act
    let reader = rig.ingest.connect("COM8", 9600).expect("connect");
    rig.wait_for_messages(7);
    rig.ingest.disconnect();
    reader.join().unwrap();

    // Assert
    let errors = rig
        .seen
        .iter()
        .filter(|m| m.severity == Severity::Error)
        .count();
    assert_eq!(errors, 2);
    assert_eq!(rig.driver.moves(), vec![(10, 20, Duration::from_millis(200))]);
}

#[test]
fn test_read_errors_keep_polling_until_disconnect() {
    // Arrange
    let rig = Rig::new(MockSerialOpener::new());
    let reader = rig.ingest.connect("COM8", 9600).expect("connect");
    let link = rig.opener.last().expect("opened");
    link.fail_reads
        .store(true, std::sync::atomic::Ordering::SeqCst);

    // Act
    let before = link.polls();
    let deadline = Instant::now() + Duration::from_secs(5);
    while link.polls() < before + 3 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(1));
    }
    let still_connected = rig.ingest.is_connected();
    rig.ingest.disconnect();
    reader.join().unwrap();

    // Assert
    assert!(link.polls() >= before + 3);
    assert!(still_connected);
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn test_failed_connect_publishes_error_and_starts_nothing() {
    // Arrange
    let opener = MockSerialOpener::new();
    opener
        .refuse
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let mut rig = Rig::new(opener);

    // Act
    let result = rig.ingest.connect("COM3", 9600);

    // Assert
    assert!(result.is_err());
    assert!(!rig.ingest.is_connected());
    let messages = drain(&mut rig.rx);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "Failed to connect: COM3: mock refused");
}

#[test]
fn test_disconnect_twice_publishes_one_message() {
    // Arrange
    let mut rig = Rig::new(MockSerialOpener::new());
    let reader = rig.ingest.connect("COM8", 9600).expect("connect");

    // Act
    let first = rig.ingest.disconnect();
    let second = rig.ingest.disconnect();
    reader.join().unwrap();

    // Assert
    assert!(first);
    assert!(!second);
    let disconnects = drain(&mut rig.rx)
        .into_iter()
        .filter(|m| m.text == "Disconnected from COM8")
        .count();
    assert_eq!(disconnects, 1);
    assert!(rig.opener.last().unwrap().is_closed());
}

#[test]
fn test_reader_stops_after_disconnect_within_one_iteration() {
    // Arrange
    let rig = Rig::new(MockSerialOpener::new());
    let reader = rig.ingest.connect("COM8", 9600).expect("connect");
    let link = rig.opener.last().unwrap();

    // Act
    rig.ingest.disconnect();
    reader.join().unwrap();
    let polls_after_join = link.polls();
    link.push_line("[1,1]");
    std::thread::sleep(Duration::from_millis(20));

    // Assert – nothing reads the link once the reader has exited
    assert_eq!(link.polls(), polls_after_join);
    assert_eq!(link.pending(), 1);
    assert!(rig.driver.moves().is_empty());
}

#[test]
fn test_reconnect_replaces_previous_link() {
    // Arrange
    let rig = Rig::new(MockSerialOpener::new());
    let first = rig.ingest.connect("COM1", 9600).expect("first connect");

    // Act
    let second = rig.ingest.connect("COM2", 9600).expect("second connect");
    first.join().unwrap();

    // Assert
    let opened = rig.opener.opened();
    assert!(opened[0].is_closed());
    assert!(!opened[1].is_closed());
    assert_eq!(rig.ingest.current_port().as_deref(), Some("COM2"));

    // Lines on the new link are still read
    opened[1].push_line("[7,8]");
    let deadline = Instant::now() + Duration::from_secs(5);
    while rig.driver.moves().is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(rig.driver.moves(), vec![(7, 8, Duration::from_millis(200))]);

    rig.ingest.disconnect();
    second.join().unwrap();
}
