//! Calibration indicator implementations.
//!
//! Drawing the calibration dot is the presentation layer's job.  The CLI has
//! no window, so [`ConsoleIndicator`] only tracks whether the dot should be
//! visible and logs each change.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tracing::info;

use crate::application::command_actions::CalibrationIndicator;

/// Indicator for headless runs.
#[derive(Debug, Default)]
pub struct ConsoleIndicator {
    visible: AtomicBool,
}

impl ConsoleIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl CalibrationIndicator for ConsoleIndicator {
    fn show(&self) {
        if !self.visible.swap(true, Ordering::SeqCst) {
            info!("calibration dot visible");
        }
    }

    fn hide(&self) {
        if self.visible.swap(false, Ordering::SeqCst) {
            info!("calibration dot hidden");
        }
    }
}

/// Counts show/hide requests.
#[derive(Debug, Default)]
pub struct MockCalibrationIndicator {
    pub shows: AtomicU32,
    pub hides: AtomicU32,
}

impl MockCalibrationIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shows(&self) -> u32 {
        self.shows.load(Ordering::SeqCst)
    }

    pub fn hides(&self) -> u32 {
        self.hides.load(Ordering::SeqCst)
    }
}

impl CalibrationIndicator for MockCalibrationIndicator {
    fn show(&self) {
        self.shows.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.hides.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_indicator_tracks_visibility() {
        // Arrange
        let indicator = ConsoleIndicator::new();
        assert!(!indicator.is_visible());

        // Act / Assert
        indicator.show();
        indicator.show();
        assert!(indicator.is_visible());

        indicator.hide();
        assert!(!indicator.is_visible());
    }

    #[test]
    fn test_hide_when_hidden_stays_hidden() {
        let indicator = ConsoleIndicator::new();
        indicator.hide();
        assert!(!indicator.is_visible());
    }
}
