//! Serial command protocol.
//!
//! The microcontroller side of gazelink speaks a deliberately tiny protocol:
//! newline-terminated UTF-8 text lines.  Three payloads are understood:
//!
//! | Line                    | Command                      | Effect                          |
//! |-------------------------|------------------------------|---------------------------------|
//! | `[100,200]`, `(1, 2)`…  | [`CoordinateCommand`]        | move the pointer to (x, y)      |
//! | `calibration_required`  | [`CalibrationRequiredCommand`] | show the calibration indicator |
//! | `calibration_done`      | [`CalibrationDoneCommand`]   | hide the calibration indicator  |
//!
//! Anything else is rejected with [`ProtocolError::UnknownCommand`].  A
//! rejected line never tears down the connection; the caller reports it and
//! reads the next one.
//!
//! [`CoordinateCommand`]: command::CoordinateCommand
//! [`CalibrationRequiredCommand`]: command::CalibrationRequiredCommand
//! [`CalibrationDoneCommand`]: command::CalibrationDoneCommand

pub mod command;
pub mod parser;

use thiserror::Error;

use crate::domain::target::PointerError;

/// The literal line that asks for the calibration indicator.
pub const CALIBRATION_REQUIRED: &str = "calibration_required";

/// The literal line that dismisses the calibration indicator.
pub const CALIBRATION_DONE: &str = "calibration_done";

/// Errors produced while classifying or executing a protocol line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// No registered command matched the line.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A coordinate line matched but did not carry exactly two integers.
    #[error("Data does not contain exactly two integers (found {found}).")]
    WrongArgumentCount { found: usize },

    /// The command was well-formed but the pointer move was refused.
    #[error(transparent)]
    Pointer(#[from] PointerError),
}
