//! Pointer drivers.
//!
//! The native driver is selected at compile time via `#[cfg(target_os = ...)]`.
//! On Linux it also needs the `x11` feature, so a default build links no
//! system libraries.
//!
//! # How does a "glide" work? (for beginners)
//!
//! No desktop API offers "move the cursor to (x, y) over 200 ms".  Every
//! driver therefore reads the current position once, then warps the cursor
//! along the straight line to the target in small steps ([`GLIDE_STEP`]
//! apart), sleeping between them.  The last step always lands exactly on the
//! target.  A zero duration is a single warp.

use std::sync::Arc;
use std::time::Duration;

use gazelink_core::{PointerError, ScreenSize};
use parking_lot::Mutex;
use tracing::debug;

use crate::application::actuate_pointer::PointerDriver;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(all(target_os = "linux", feature = "x11"))]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod macos;

/// Time between two intermediate warps of a glide.
pub const GLIDE_STEP: Duration = Duration::from_millis(10);

/// Moves from `from` to `to` in [`GLIDE_STEP`] increments spread over
/// `duration`, calling `warp` for every intermediate point.
///
/// # Errors
///
/// Stops at, and returns, the first error from `warp`.
pub fn glide<F>(from: (i32, i32), to: (u32, u32), duration: Duration, mut warp: F) -> Result<(), PointerError>
where
    F: FnMut(i32, i32) -> Result<(), PointerError>,
{
    let target = (to.0 as i32, to.1 as i32);
    let steps = (duration.as_millis() / GLIDE_STEP.as_millis()).max(1) as u32;
    let pause = duration / steps;

    for step in 1..=steps {
        let t = f64::from(step) / f64::from(steps);
        let x = lerp(from.0, target.0, t);
        let y = lerp(from.1, target.1, t);
        warp(x, y)?;
        if step < steps {
            std::thread::sleep(pause);
        }
    }
    Ok(())
}

fn lerp(from: i32, to: i32, t: f64) -> i32 {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as i32
}

// ── Native driver selection ───────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub type NativePointerDriver = windows::WindowsPointerDriver;

#[cfg(target_os = "macos")]
pub type NativePointerDriver = macos::MacosPointerDriver;

#[cfg(all(target_os = "linux", feature = "x11"))]
pub type NativePointerDriver = linux::X11PointerDriver;

/// Creates the native pointer driver for this build.
///
/// # Errors
///
/// Returns [`PointerError::Platform`] when the build has no native driver
/// (Linux without the `x11` feature, or an unsupported OS) or when the
/// driver cannot reach the display.
pub fn native_driver() -> Result<Arc<dyn PointerDriver>, PointerError> {
    #[cfg(any(
        target_os = "windows",
        target_os = "macos",
        all(target_os = "linux", feature = "x11")
    ))]
    {
        let driver = NativePointerDriver::new()?;
        Ok(Arc::new(driver))
    }

    #[cfg(not(any(
        target_os = "windows",
        target_os = "macos",
        all(target_os = "linux", feature = "x11")
    )))]
    {
        Err(PointerError::Platform(
            "no native pointer driver in this build (enable the `x11` feature or run --headless)"
                .to_string(),
        ))
    }
}

// ── Headless driver ───────────────────────────────────────────────────────────

/// A pointer that only exists in memory.
///
/// Used by `--headless` runs: every move is logged and the position updated
/// instantly, without sleeping through the glide.
#[derive(Debug)]
pub struct VirtualPointer {
    screen: ScreenSize,
    position: Mutex<(u32, u32)>,
}

impl VirtualPointer {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            screen,
            position: Mutex::new((0, 0)),
        }
    }

    /// Last position the pointer was moved to.
    pub fn position(&self) -> (u32, u32) {
        *self.position.lock()
    }
}

impl PointerDriver for VirtualPointer {
    fn screen_size(&self) -> Result<ScreenSize, PointerError> {
        Ok(self.screen)
    }

    fn move_to(&self, x: u32, y: u32, duration: Duration) -> Result<(), PointerError> {
        debug!(x, y, ?duration, "virtual pointer moved");
        *self.position.lock() = (x, y);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
