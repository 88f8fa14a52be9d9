//! Linux X11 pointer driver via Xlib.
//!
//! # How does it work? (for beginners)
//!
//! X11 clients talk to the display server through a `Display` connection.
//! The driver opens its own connection (`XOpenDisplay`), reads the size of the
//! default screen, asks where the pointer is (`XQueryPointer`) and moves it
//! with `XWarpPointer` relative to the root window.  `XFlush` pushes each
//! request to the server immediately so the glide is visible.
//!
//! The connection is opened per call: the driver is shared between threads,
//! and an Xlib `Display` must not be used from two threads at once.
//!
//! Requires the `DISPLAY` environment variable to point at a reachable X
//! server; Wayland sessions need XWayland.

#![cfg(all(target_os = "linux", feature = "x11"))]

use std::os::raw::{c_int, c_uint};
use std::ptr;
use std::time::Duration;

use gazelink_core::{PointerError, ScreenSize};
use x11::xlib;

use super::glide;
use crate::application::actuate_pointer::PointerDriver;

/// Owned Xlib connection, closed on drop.
struct Connection(*mut xlib::Display);

impl Connection {
    fn open() -> Result<Self, PointerError> {
        // SAFETY: a null name means "use $DISPLAY".
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(PointerError::Platform(
                "cannot open X display (is DISPLAY set?)".to_string(),
            ));
        }
        Ok(Self(display))
    }

    fn screen_size(&self) -> ScreenSize {
        // SAFETY: self.0 is a live connection.
        unsafe {
            let screen = xlib::XDefaultScreen(self.0);
            ScreenSize::new(
                xlib::XDisplayWidth(self.0, screen) as u32,
                xlib::XDisplayHeight(self.0, screen) as u32,
            )
        }
    }

    fn pointer_position(&self) -> Result<(i32, i32), PointerError> {
        let mut root_return: xlib::Window = 0;
        let mut child_return: xlib::Window = 0;
        let (mut root_x, mut root_y, mut win_x, mut win_y): (c_int, c_int, c_int, c_int) =
            (0, 0, 0, 0);
        let mut mask: c_uint = 0;
        // SAFETY: self.0 is a live connection and every out-pointer is valid.
        let on_screen = unsafe {
            xlib::XQueryPointer(
                self.0,
                xlib::XDefaultRootWindow(self.0),
                &mut root_return,
                &mut child_return,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };
        if on_screen == 0 {
            return Err(PointerError::Platform(
                "pointer is not on the default screen".to_string(),
            ));
        }
        Ok((root_x, root_y))
    }

    fn warp(&self, x: i32, y: i32) {
        // SAFETY: self.0 is a live connection; src window 0 means "anywhere".
        unsafe {
            xlib::XWarpPointer(self.0, 0, xlib::XDefaultRootWindow(self.0), 0, 0, 0, 0, x, y);
            xlib::XFlush(self.0);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // SAFETY: self.0 came from XOpenDisplay and is closed exactly once.
        unsafe {
            xlib::XCloseDisplay(self.0);
        }
    }
}

/// X11 implementation of [`PointerDriver`].
pub struct X11PointerDriver;

impl X11PointerDriver {
    /// Checks that the X server is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::Platform`] if `XOpenDisplay` fails.
    pub fn new() -> Result<Self, PointerError> {
        Connection::open()?;
        Ok(Self)
    }
}

impl PointerDriver for X11PointerDriver {
    fn screen_size(&self) -> Result<ScreenSize, PointerError> {
        Ok(Connection::open()?.screen_size())
    }

    fn move_to(&self, x: u32, y: u32, duration: Duration) -> Result<(), PointerError> {
        let connection = Connection::open()?;
        let start = connection.pointer_position()?;
        glide(start, (x, y), duration, |x, y| {
            connection.warp(x, y);
            Ok(())
        })
    }
}
