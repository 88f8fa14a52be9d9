//! Pointer targets and the bounds rule that guards every pointer move.
//!
//! A target is accepted only when both coordinates parse as integers, are
//! non-negative, and do not exceed the screen dimensions *as queried at call
//! time*.  Note the upper bound is inclusive: on a 1920×1080 screen the target
//! `(1920, 1080)` is accepted.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a requested pointer target was rejected.
///
/// The display strings are the messages shown to the operator, so they are
/// phrased as instructions rather than diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetError {
    /// One of the inputs is not an integer.
    #[error("Coordinates must be valid non-negative integers (got x={x:?}, y={y:?}).")]
    NotAnInteger { x: String, y: String },

    /// At least one coordinate is below zero.
    #[error("Coordinates must be non-negative (got {x}, {y}).")]
    Negative { x: i64, y: i64 },

    /// At least one coordinate lies past the right or bottom screen edge.
    #[error("Coordinates must be within screen size: {}x{} (got {x}, {y}).", screen.width, screen.height)]
    OutOfBounds { x: i64, y: i64, screen: ScreenSize },
}

/// Error type for pointer actuation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PointerError {
    /// The target failed validation; the pointer was not moved.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] TargetError),

    /// The OS refused the screen query or the cursor move.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Dimensions of the primary screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A validated pointer destination.
///
/// Only obtainable through [`PointerTarget::validate`] or
/// [`PointerTarget::parse`], so holding one means the bounds check passed
/// against the screen size that was current when it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerTarget {
    x: u32,
    y: u32,
}

impl PointerTarget {
    /// Parses textual coordinates and validates them against `screen`.
    ///
    /// Leading and trailing whitespace is ignored; anything else that is not
    /// an optionally signed decimal integer is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::NotAnInteger`] if either input fails to parse,
    /// otherwise whatever [`PointerTarget::validate`] returns.
    pub fn parse(x_input: &str, y_input: &str, screen: ScreenSize) -> Result<Self, TargetError> {
        let parsed = x_input
            .trim()
            .parse::<i64>()
            .and_then(|x| y_input.trim().parse::<i64>().map(|y| (x, y)));
        match parsed {
            Ok((x, y)) => Self::validate(x, y, screen),
            Err(_) => Err(TargetError::NotAnInteger {
                x: x_input.to_string(),
                y: y_input.to_string(),
            }),
        }
    }

    /// Checks `(x, y)` against `screen`.
    ///
    /// # Errors
    ///
    /// - [`TargetError::Negative`] if either coordinate is below zero.
    /// - [`TargetError::OutOfBounds`] if `x > width` or `y > height`.
    pub fn validate(x: i64, y: i64, screen: ScreenSize) -> Result<Self, TargetError> {
        if x < 0 || y < 0 {
            return Err(TargetError::Negative { x, y });
        }
        if x > i64::from(screen.width) || y > i64::from(screen.height) {
            return Err(TargetError::OutOfBounds { x, y, screen });
        }
        // Both values are in [0, u32::MAX] after the checks above.
        Ok(Self {
            x: x as u32,
            y: y as u32,
        })
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }
}

/// How quickly the pointer glides to its target.
///
/// Serial input uses a faster glide than interactive moves so a stream of
/// coordinates from a microcontroller does not queue up behind slow
/// animations; the random tier is shorter still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedTier {
    Interactive,
    Serial,
    Random,
}

/// Concrete glide durations for each [`SpeedTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTiers {
    pub interactive: Duration,
    pub serial: Duration,
    pub random: Duration,
}

impl SpeedTiers {
    pub fn duration(&self, tier: SpeedTier) -> Duration {
        match tier {
            SpeedTier::Interactive => self.interactive,
            SpeedTier::Serial => self.serial,
            SpeedTier::Random => self.random,
        }
    }
}

impl Default for SpeedTiers {
    fn default() -> Self {
        Self {
            interactive: Duration::from_millis(700),
            serial: Duration::from_millis(200),
            random: Duration::from_millis(120),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
