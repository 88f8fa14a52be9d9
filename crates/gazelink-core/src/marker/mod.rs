//! Fiducial-marker coordinate code.
//!
//! # How four markers become one coordinate (for beginners)
//!
//! The marker-producing side shows four ArUco markers in a row.  Each marker
//! carries a small integer identifier (0–99 in the default `6x6_100`
//! dictionary).  Read left to right, the identifiers form two base-100
//! two-digit numbers:
//!
//! ```text
//!   [ 1 ] [ 2 ]   [ 3 ] [ 4 ]
//!   └── x ──┘     └── y ──┘
//!   x = 100*1 + 2 = 102
//!   y = 100*3 + 4 = 304
//! ```
//!
//! That lets four small markers address any coordinate up to 9999 on either
//! axis.
//!
//! # Sub-modules
//!
//! - **`code`** – Ordering observations and the id↔coordinate conversion.
//! - **`detector`** – The [`MarkerDetector`] boundary to the host vision
//!   library.
//! - **`decoder`** – [`MarkerDecoder`]: detector + ordering + code in one call.
//!
//! [`MarkerDetector`]: detector::MarkerDetector
//! [`MarkerDecoder`]: decoder::MarkerDecoder

pub mod code;
pub mod decoder;
pub mod detector;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One detected marker: where its left edge sits in the frame, and its id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerObservation {
    /// Horizontal pixel position of the marker's first corner.
    pub x_position: f32,
    /// Identifier decoded from the marker pattern.
    pub id: u32,
}

impl MarkerObservation {
    pub fn new(x_position: f32, id: u32) -> Self {
        Self { x_position, id }
    }
}

/// Predefined ArUco dictionaries the detector can be configured with.
///
/// The identifiers match the names used in configuration files
/// (`dictionary = "6x6_100"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarkerDictionary {
    #[serde(rename = "4x4_50")]
    Aruco4x4_50,
    #[serde(rename = "5x5_100")]
    Aruco5x5_100,
    #[default]
    #[serde(rename = "6x6_100")]
    Aruco6x6_100,
    #[serde(rename = "7x7_250")]
    Aruco7x7_250,
}

impl MarkerDictionary {
    /// Number of distinct identifiers in the dictionary.
    pub fn size(&self) -> u32 {
        match self {
            Self::Aruco4x4_50 => 50,
            Self::Aruco5x5_100 | Self::Aruco6x6_100 => 100,
            Self::Aruco7x7_250 => 250,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aruco4x4_50 => "4x4_50",
            Self::Aruco5x5_100 => "5x5_100",
            Self::Aruco6x6_100 => "6x6_100",
            Self::Aruco7x7_250 => "7x7_250",
        }
    }
}

impl fmt::Display for MarkerDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkerDictionary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4x4_50" => Ok(Self::Aruco4x4_50),
            "5x5_100" => Ok(Self::Aruco5x5_100),
            "6x6_100" => Ok(Self::Aruco6x6_100),
            "7x7_250" => Ok(Self::Aruco7x7_250),
            other => Err(format!("unknown marker dictionary: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dictionary_is_6x6_100() {
        assert_eq!(MarkerDictionary::default(), MarkerDictionary::Aruco6x6_100);
    }

    #[test]
    fn test_dictionary_name_round_trips_through_from_str() {
        for dict in [
            MarkerDictionary::Aruco4x4_50,
            MarkerDictionary::Aruco5x5_100,
            MarkerDictionary::Aruco6x6_100,
            MarkerDictionary::Aruco7x7_250,
        ] {
            assert_eq!(dict.name().parse::<MarkerDictionary>(), Ok(dict));
        }
    }

    #[test]
    fn test_unknown_dictionary_name_is_rejected() {
        assert!("8x8_1000".parse::<MarkerDictionary>().is_err());
    }
}
