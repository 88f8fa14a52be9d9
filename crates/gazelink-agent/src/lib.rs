//! gazelink-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the agent do? (for beginners)
//!
//! The agent is the process that actually moves the pointer.  It owns up to
//! two ingestion channels, each running on its own OS thread:
//!
//! 1. **Serial** – reads newline-terminated text from a microcontroller,
//!    classifies each line with the `gazelink_core` command parser and
//!    executes it (move the pointer, show or hide the calibration indicator).
//! 2. **Video** – grabs frames from a camera, decodes the four ArUco markers
//!    in view into an (x, y) target and moves the pointer there.
//!
//! Both channels publish human-readable status lines to a [`StatusSink`]
//! that the presentation layer (here: the CLI in `main.rs`) drains and shows.
//!
//! [`StatusSink`]: application::status::StatusSink

/// Application layer: actuation, ingestion loops, status publishing.
pub mod application;

/// Infrastructure layer: OS pointer drivers, serial ports, cameras, vision,
/// configuration storage.
pub mod infrastructure;
