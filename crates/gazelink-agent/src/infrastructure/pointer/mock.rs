//! Mock pointer driver for unit and integration testing.
//!
//! The native drivers move the real cursor on the test machine and need a
//! desktop session.  `MockPointerDriver` replaces the OS calls with in-memory
//! recording so tests can assert exactly which moves were requested, in which
//! order and with which glide duration.
//!
//! # Usage in tests
//!
//! ```ignore
//! let driver = Arc::new(MockPointerDriver::new(ScreenSize::new(1920, 1080)));
//! let actuator = PointerActuator::new(Arc::clone(&driver) as Arc<dyn PointerDriver>);
//!
//! actuator.move_to("100", "200", SpeedTier::Serial).unwrap();
//!
//! assert_eq!(driver.moves(), vec![(100, 200, Duration::from_millis(200))]);
//! ```
//!
//! Use [`MockPointerDriver::failing`] (or set `should_fail`) to make every
//! call return `PointerError::Platform`.

use std::time::Duration;

use gazelink_core::{PointerError, ScreenSize};
use parking_lot::Mutex;

use crate::application::actuate_pointer::PointerDriver;

/// Records every move without touching the OS.
#[derive(Debug)]
pub struct MockPointerDriver {
    /// Each `(x, y, duration)` passed to `move_to`.
    pub moves: Mutex<Vec<(u32, u32, Duration)>>,
    screen: Mutex<ScreenSize>,
    /// When `true`, every method returns `PointerError::Platform`.
    pub should_fail: bool,
}

impl MockPointerDriver {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            moves: Mutex::new(Vec::new()),
            screen: Mutex::new(screen),
            should_fail: false,
        }
    }

    /// A driver whose every call fails with `PointerError::Platform`.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Simulates a display change.
    pub fn set_screen_size(&self, screen: ScreenSize) {
        *self.screen.lock() = screen;
    }

    /// Snapshot of the recorded moves.
    pub fn moves(&self) -> Vec<(u32, u32, Duration)> {
        self.moves.lock().clone()
    }
}

impl Default for MockPointerDriver {
    fn default() -> Self {
        Self::new(ScreenSize::new(1920, 1080))
    }
}

impl PointerDriver for MockPointerDriver {
    fn screen_size(&self) -> Result<ScreenSize, PointerError> {
        if self.should_fail {
            return Err(PointerError::Platform("mock failure".to_string()));
        }
        Ok(*self.screen.lock())
    }

    fn move_to(&self, x: u32, y: u32, duration: Duration) -> Result<(), PointerError> {
        if self.should_fail {
            return Err(PointerError::Platform("mock failure".to_string()));
        }
        self.moves.lock().push((x, y, duration));
        Ok(())
    }
}
