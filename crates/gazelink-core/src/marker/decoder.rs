//! [`MarkerDecoder`]: frame in, coordinate out.

use std::sync::Arc;

use image::RgbImage;
use tracing::{debug, error};

use super::code::{ids_to_coordinates, order_ids};
use super::detector::MarkerDetector;

/// Combines a [`MarkerDetector`] with the ordering and base-100 code.
pub struct MarkerDecoder {
    detector: Arc<dyn MarkerDetector>,
}

impl MarkerDecoder {
    pub fn new(detector: Arc<dyn MarkerDetector>) -> Self {
        Self { detector }
    }

    /// Returns the identifiers found in `frame`, in left-to-right order.
    ///
    /// Detector failures are logged and treated as "no markers".
    pub fn detect_ids(&self, frame: &RgbImage) -> Vec<u32> {
        let observations = match self.detector.detect(frame) {
            Ok(observations) => observations,
            Err(e) => {
                error!("marker detection failed: {e}");
                return Vec::new();
            }
        };
        debug!(count = observations.len(), "markers detected");
        if observations.is_empty() {
            error!("No ArUco markers detected.");
            return Vec::new();
        }
        order_ids(&observations)
    }

    /// Decodes `frame` into `(x, y)`, or `None` when the frame does not show
    /// exactly four markers.
    pub fn decode(&self, frame: &RgbImage) -> Option<(u32, u32)> {
        let ids = self.detect_ids(frame);
        if ids.is_empty() {
            return None;
        }
        let coordinates = ids_to_coordinates(&ids);
        debug!(?ids, ?coordinates, "decoded marker ids");
        coordinates
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
