//! The [`Command`] trait and the built-in commands.
//!
//! A command is a pair of capabilities: `matches` decides whether a line
//! belongs to it, `execute` carries it out.  Side effects never happen inside
//! this crate; they are requested through a [`CommandActions`] implementation
//! supplied by the caller (the agent wires it to the pointer actuator and the
//! calibration indicator).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use super::{ProtocolError, CALIBRATION_DONE, CALIBRATION_REQUIRED};
use crate::domain::target::{PointerError, PointerTarget, SpeedTier};

/// Side effects a command may request.
pub trait CommandActions: Send + Sync {
    /// Validates `(x_input, y_input)` and moves the pointer there.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError`] if the target is invalid or the OS call fails.
    fn move_pointer(
        &self,
        x_input: &str,
        y_input: &str,
        tier: SpeedTier,
    ) -> Result<PointerTarget, PointerError>;

    /// Shows the calibration indicator.
    fn show_calibration(&self);

    /// Hides the calibration indicator.
    fn hide_calibration(&self);
}

/// What a successfully executed command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Moved(PointerTarget),
    CalibrationShown,
    CalibrationHidden,
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved(target) => write!(f, "moved pointer to ({}, {})", target.x(), target.y()),
            Self::CalibrationShown => write!(f, "{CALIBRATION_REQUIRED}: showing calibration dot"),
            Self::CalibrationHidden => write!(f, "{CALIBRATION_DONE}: hiding calibration dot"),
        }
    }
}

/// A pluggable protocol command.
pub trait Command: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns `true` if this command is responsible for `line`.
    fn matches(&self, line: &str) -> bool;

    /// Executes the command for `line`.
    ///
    /// Only called after [`Command::matches`] returned `true` for the same line.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the line is malformed for this command or
    /// the requested action fails.
    fn execute(
        &self,
        line: &str,
        actions: &dyn CommandActions,
    ) -> Result<CommandOutcome, ProtocolError>;
}

// ── Coordinate command ────────────────────────────────────────────────────────

fn pair_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+,\s*\d+").expect("coordinate pair pattern compiles"))
}

fn digit_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("digit run pattern compiles"))
}

/// Moves the pointer to a decimal pair found anywhere in the line.
///
/// `matches` is a substring search for `digits,digits` (whitespace allowed
/// after the comma), so brackets, parentheses and even a leading minus sign
/// are ignored: `[-100,200]` moves to (100, 200).
///
/// `execute` then counts *every* digit run in the line.  A line such as
/// `123,456,789` therefore matches but fails with
/// [`ProtocolError::WrongArgumentCount`]; likewise `455, 123.5` matches and
/// fails because `123.5` contributes two runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateCommand;

impl Command for CoordinateCommand {
    fn name(&self) -> &'static str {
        "coordinate"
    }

    fn matches(&self, line: &str) -> bool {
        pair_pattern().is_match(line)
    }

    fn execute(
        &self,
        line: &str,
        actions: &dyn CommandActions,
    ) -> Result<CommandOutcome, ProtocolError> {
        let runs: Vec<&str> = digit_run_pattern()
            .find_iter(line)
            .map(|m| m.as_str())
            .collect();
        let [x, y] = runs.as_slice() else {
            return Err(ProtocolError::WrongArgumentCount { found: runs.len() });
        };
        let target = actions.move_pointer(x, y, SpeedTier::Serial)?;
        Ok(CommandOutcome::Moved(target))
    }
}

// ── Calibration commands ──────────────────────────────────────────────────────

/// Shows the calibration indicator when the line is `calibration_required`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalibrationRequiredCommand;

impl Command for CalibrationRequiredCommand {
    fn name(&self) -> &'static str {
        CALIBRATION_REQUIRED
    }

    fn matches(&self, line: &str) -> bool {
        line.trim() == CALIBRATION_REQUIRED
    }

    fn execute(
        &self,
        _line: &str,
        actions: &dyn CommandActions,
    ) -> Result<CommandOutcome, ProtocolError> {
        let outcome = CommandOutcome::CalibrationShown;
        info!("{outcome}");
        actions.show_calibration();
        Ok(outcome)
    }
}

/// Hides the calibration indicator when the line is `calibration_done`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalibrationDoneCommand;

impl Command for CalibrationDoneCommand {
    fn name(&self) -> &'static str {
        CALIBRATION_DONE
    }

    fn matches(&self, line: &str) -> bool {
        line.trim() == CALIBRATION_DONE
    }

    fn execute(
        &self,
        _line: &str,
        actions: &dyn CommandActions,
    ) -> Result<CommandOutcome, ProtocolError> {
        let outcome = CommandOutcome::CalibrationHidden;
        info!("{outcome}");
        actions.hide_calibration();
        Ok(outcome)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
