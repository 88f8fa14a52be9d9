//! Marker detection backends.
//!
//! The only real backend is OpenCV's ArUco detector in [`aruco`], built with
//! the `opencv` feature.  Without it the agent can still run the serial
//! channel; `--camera` then fails at startup.

#[cfg(feature = "opencv")]
pub mod aruco;
