//! Boundary to the host vision library.
//!
//! Detection itself (thresholding, contour finding, bit extraction) is the
//! job of a real vision library; gazelink only needs the resulting list of
//! `(position, id)` pairs.  The agent provides an OpenCV-backed
//! implementation behind its `opencv` feature.

use image::RgbImage;
use thiserror::Error;

use super::{MarkerDictionary, MarkerObservation};

/// Error type for marker detection.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The frame could not be converted into the detector's input format.
    #[error("frame conversion failed: {0}")]
    Frame(String),
    /// The underlying vision library reported a failure.
    #[error("vision backend error: {0}")]
    Backend(String),
}

/// Finds fiducial markers in a frame.
#[cfg_attr(test, mockall::automock)]
pub trait MarkerDetector: Send + Sync {
    /// The dictionary this detector decodes against.
    fn dictionary(&self) -> MarkerDictionary;

    /// Returns every marker found in `frame`, in no particular order.
    ///
    /// An empty `Vec` means "nothing detected" and is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError`] if the vision backend fails.
    fn detect(&self, frame: &RgbImage) -> Result<Vec<MarkerObservation>, DetectError>;
}
