//! # gazelink-core
//!
//! Shared library for gazelink containing the serial command protocol, the
//! fiducial-marker coordinate code, and the rules that decide whether a
//! pointer target is valid for the current screen.
//!
//! This crate has zero dependencies on OS APIs, serial ports, or cameras.
//! Everything that touches the outside world is expressed as a trait
//! ([`protocol::CommandActions`], [`marker::MarkerDetector`]) and implemented
//! by the `gazelink-agent` crate.
//!
//! # Architecture overview (for beginners)
//!
//! gazelink lets an external sensor steer the on-screen pointer.  There are
//! two independent ways for a target coordinate to arrive:
//!
//! - **Serial**: a microcontroller writes text lines such as `[100,200]` or
//!   `calibration_required` to a serial port.  The [`protocol`] module
//!   classifies each line and executes the matching command.
//!
//! - **Vision**: a camera watches four ArUco markers.  Their identifiers,
//!   read left to right, encode an (x, y) pair.  The [`marker`] module orders
//!   the detected markers and folds their identifiers into a coordinate.
//!
//! Both paths end at the same place: a request to move the pointer, validated
//! by the rules in [`domain`].

pub mod domain;
pub mod marker;
pub mod protocol;

pub use domain::target::{
    PointerError, PointerTarget, ScreenSize, SpeedTier, SpeedTiers, TargetError,
};
pub use marker::{
    decoder::MarkerDecoder, detector::DetectError, detector::MarkerDetector, MarkerDictionary,
    MarkerObservation,
};
pub use protocol::{
    command::{Command, CommandActions, CommandOutcome},
    parser::CommandParser,
    ProtocolError,
};
