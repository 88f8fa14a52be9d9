//! Scripted cameras for tests.
//!
//! A `MockVideoSource` serves a fixed number of blank frames, then reports
//! transient read failures until it is released, after which every read
//! returns `VideoError::Closed`.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use image::RgbImage;
use parking_lot::Mutex;

use crate::application::device::ConnectionError;
use crate::application::video_ingest::{VideoError, VideoOpener, VideoSource};

/// A camera that produces `frames` blank frames.
#[derive(Debug)]
pub struct MockVideoSource {
    name: String,
    resolution: (u32, u32),
    frames_left: AtomicU32,
    reads: AtomicU32,
    released: AtomicBool,
}

impl MockVideoSource {
    pub fn new(name: &str, resolution: (u32, u32), frames: u32) -> Self {
        Self {
            name: name.to_string(),
            resolution,
            frames_left: AtomicU32::new(frames),
            reads: AtomicU32::new(0),
            released: AtomicBool::new(false),
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Number of `read_frame` calls so far.
    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl VideoSource for MockVideoSource {
    fn device_name(&self) -> &str {
        &self.name
    }

    fn read_frame(&self) -> Result<RgbImage, VideoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.is_released() {
            return Err(VideoError::Closed);
        }
        let remaining = self
            .frames_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match remaining {
            Ok(_) => Ok(RgbImage::new(self.resolution.0, self.resolution.1)),
            Err(_) => Err(VideoError::ReadFailed("mock camera has no more frames".to_string())),
        }
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Opens [`MockVideoSource`]s for a fixed set of indices.
#[derive(Debug)]
pub struct MockVideoOpener {
    available: Vec<u32>,
    frames: u32,
    opened: Mutex<Vec<Arc<MockVideoSource>>>,
}

impl MockVideoOpener {
    /// Devices at `available` open; each serves `frames` frames.
    pub fn new(available: &[u32], frames: u32) -> Self {
        Self {
            available: available.to_vec(),
            frames,
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Every source opened so far, oldest first.
    pub fn opened(&self) -> Vec<Arc<MockVideoSource>> {
        self.opened.lock().clone()
    }
}

impl VideoOpener for MockVideoOpener {
    fn open(
        &self,
        index: u32,
        resolution: (u32, u32),
    ) -> Result<Arc<dyn VideoSource>, ConnectionError> {
        if !self.available.contains(&index) {
            return Err(ConnectionError::Open {
                device: format!("mock camera {index}"),
                reason: "no such device".to_string(),
            });
        }
        // Keep mock frames tiny; the requested resolution only sets the aspect.
        let scaled = ((resolution.0 / 240).max(1), (resolution.1 / 240).max(1));
        let source = Arc::new(MockVideoSource::new(
            &format!("mock camera {index}"),
            scaled,
            self.frames,
        ));
        self.opened.lock().push(Arc::clone(&source));
        Ok(source)
    }
}
