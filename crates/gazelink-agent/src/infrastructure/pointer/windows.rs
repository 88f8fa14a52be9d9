//! Windows pointer driver via `GetSystemMetrics` and `SetCursorPos`.
//!
//! Coordinates are physical pixels on the primary monitor, origin top-left.

#![cfg(target_os = "windows")]

use std::time::Duration;

use gazelink_core::{PointerError, ScreenSize};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN,
};

use super::glide;
use crate::application::actuate_pointer::PointerDriver;

/// Windows implementation of [`PointerDriver`].
pub struct WindowsPointerDriver;

impl WindowsPointerDriver {
    /// # Errors
    ///
    /// Never fails; the signature matches the other native drivers.
    pub fn new() -> Result<Self, PointerError> {
        Ok(Self)
    }
}

impl PointerDriver for WindowsPointerDriver {
    fn screen_size(&self) -> Result<ScreenSize, PointerError> {
        // SAFETY: GetSystemMetrics has no preconditions.
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        if width <= 0 || height <= 0 {
            return Err(PointerError::Platform(
                "GetSystemMetrics returned no primary screen".to_string(),
            ));
        }
        Ok(ScreenSize::new(width as u32, height as u32))
    }

    fn move_to(&self, x: u32, y: u32, duration: Duration) -> Result<(), PointerError> {
        let mut start = POINT::default();
        // SAFETY: `start` is a valid, writable POINT.
        unsafe { GetCursorPos(&mut start) }
            .map_err(|e| PointerError::Platform(format!("GetCursorPos failed: {e}")))?;

        glide((start.x, start.y), (x, y), duration, |x, y| {
            // SAFETY: SetCursorPos has no pointer arguments.
            unsafe { SetCursorPos(x, y) }
                .map_err(|e| PointerError::Platform(format!("SetCursorPos failed: {e}")))
        })
    }
}
