//! Video sources and frame sinks.
//!
//! The OpenCV capture and preview window live in [`capture`] and are only
//! built with the `opencv` feature.  [`HeadlessFrameSink`] and the scripted
//! mocks are always available.

use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbImage;
use tracing::trace;

use crate::application::video_ingest::FrameSink;

#[cfg(feature = "opencv")]
pub mod capture;

pub mod mock;

/// Highest device index probed by `--list-cameras`.
pub const MAX_PROBED_DEVICES: u32 = 10;

/// Frame sink for runs without a display: counts frames and drops them.
#[derive(Debug, Default)]
pub struct HeadlessFrameSink {
    frames: AtomicU64,
}

impl HeadlessFrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames shown so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

impl FrameSink for HeadlessFrameSink {
    fn show_frame(&self, frame: &RgbImage) {
        let count = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(count, width = frame.width(), height = frame.height(), "frame dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_sink_counts_frames() {
        let sink = HeadlessFrameSink::new();
        let frame = RgbImage::new(2, 2);

        sink.show_frame(&frame);
        sink.show_frame(&frame);

        assert_eq!(sink.frames(), 2);
    }
}
