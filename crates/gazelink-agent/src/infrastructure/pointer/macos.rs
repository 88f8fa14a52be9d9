//! macOS pointer driver via CoreGraphics.
//!
//! `CGDisplay` reports the main display bounds in points with the origin at
//! the top-left, which matches the coordinate system of the target pairs, so
//! no Y flip is needed for cursor warping.
//!
//! Warping the cursor does not require the Accessibility permission, unlike
//! posting synthetic events.

#![cfg(target_os = "macos")]

use std::time::Duration;

use core_graphics::display::{CGDisplay, CGPoint};
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use gazelink_core::{PointerError, ScreenSize};

use super::glide;
use crate::application::actuate_pointer::PointerDriver;

/// macOS implementation of [`PointerDriver`].
pub struct MacosPointerDriver;

impl MacosPointerDriver {
    /// # Errors
    ///
    /// Never fails; the signature matches the other native drivers.
    pub fn new() -> Result<Self, PointerError> {
        Ok(Self)
    }

    fn current_position() -> Result<(i32, i32), PointerError> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .map_err(|_| PointerError::Platform("cannot create CGEventSource".to_string()))?;
        let event = CGEvent::new(source)
            .map_err(|_| PointerError::Platform("cannot create CGEvent".to_string()))?;
        let location = event.location();
        Ok((location.x.round() as i32, location.y.round() as i32))
    }
}

impl PointerDriver for MacosPointerDriver {
    fn screen_size(&self) -> Result<ScreenSize, PointerError> {
        let bounds = CGDisplay::main().bounds();
        Ok(ScreenSize::new(
            bounds.size.width as u32,
            bounds.size.height as u32,
        ))
    }

    fn move_to(&self, x: u32, y: u32, duration: Duration) -> Result<(), PointerError> {
        let start = Self::current_position()?;
        glide(start, (x, y), duration, |x, y| {
            CGDisplay::warp_mouse_cursor_position(CGPoint::new(f64::from(x), f64::from(y)))
                .map_err(|e| PointerError::Platform(format!("cursor warp failed: {e:?}")))
        })
    }
}
