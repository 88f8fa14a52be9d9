//! Video ingestion channel.
//!
//! Grabs frames from the current camera, shows each one on a [`FrameSink`],
//! decodes the four-marker coordinate and moves the pointer there at the
//! interactive speed.
//!
//! Cancellation works like the serial channel (a [`DeviceSlot`] holding the
//! current source) plus a stop flag, because a frame read can block for far
//! longer than a serial poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use gazelink_core::{MarkerDecoder, SpeedTier};
use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::actuate_pointer::PointerActuator;
use super::device::{ConnectionError, DeviceSlot};
use super::status::StatusSink;

/// Frame read failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VideoError {
    /// The read failed but the device may recover; the loop retries.
    #[error("frame read failed: {0}")]
    ReadFailed(String),

    /// The device is gone; the loop ends.
    #[error("video device closed")]
    Closed,
}

/// An open camera.
pub trait VideoSource: Send + Sync {
    /// Human-readable device name, used in status messages.
    fn device_name(&self) -> &str;

    /// Blocks until the next frame is available.
    fn read_frame(&self) -> Result<RgbImage, VideoError>;

    /// Releases the device.  Calling it twice is harmless.
    fn release(&self);
}

/// Opens cameras by index.
pub trait VideoOpener: Send + Sync {
    /// Opens device `index`, requesting `resolution` (width, height).
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Open`] if the device cannot be opened.
    fn open(&self, index: u32, resolution: (u32, u32))
        -> Result<Arc<dyn VideoSource>, ConnectionError>;
}

/// Display surface for captured frames.
pub trait FrameSink: Send + Sync {
    fn show_frame(&self, frame: &RgbImage);
}

/// Capture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSettings {
    /// Requested capture resolution (width, height).
    pub resolution: (u32, u32),
    /// Pause after each frame.
    pub frame_interval: Duration,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            resolution: (1920, 1080),
            frame_interval: Duration::from_millis(50),
        }
    }
}

/// The video ingestion use case.
pub struct VideoIngest {
    opener: Arc<dyn VideoOpener>,
    decoder: Arc<MarkerDecoder>,
    actuator: Arc<PointerActuator>,
    sink: Arc<dyn FrameSink>,
    status: StatusSink,
    current: Arc<DeviceSlot<dyn VideoSource>>,
    stop_requested: Arc<AtomicBool>,
    settings: VideoSettings,
}

impl VideoIngest {
    pub fn new(
        opener: Arc<dyn VideoOpener>,
        decoder: Arc<MarkerDecoder>,
        actuator: Arc<PointerActuator>,
        sink: Arc<dyn FrameSink>,
        status: StatusSink,
    ) -> Self {
        Self {
            opener,
            decoder,
            actuator,
            sink,
            status,
            current: Arc::new(DeviceSlot::new()),
            stop_requested: Arc::new(AtomicBool::new(false)),
            settings: VideoSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: VideoSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Opens camera `device_index` and starts the capture thread.
    ///
    /// Any running capture is stopped first.  The open happens on the calling
    /// thread so a failure is reported to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the device cannot be opened or the
    /// capture thread cannot be spawned.
    pub fn start(&self, device_index: u32) -> Result<JoinHandle<()>, ConnectionError> {
        self.stop();

        let source = match self.opener.open(device_index, self.settings.resolution) {
            Ok(source) => source,
            Err(e) => {
                self.status.error(format!("Failed to open video device: {e}"));
                return Err(e);
            }
        };

        self.stop_requested.store(false, Ordering::SeqCst);
        // A concurrent start may have installed its device since our stop;
        // release it so at most one device stays open.
        if let Some(previous) = self.current.replace(Arc::clone(&source)) {
            self.status
                .info(format!("End video capture from {}", previous.device_name()));
            previous.release();
        }
        self.status
            .info(format!("Opened video device {}", source.device_name()));

        let capture = Capture {
            source: Arc::clone(&source),
            slot: Arc::clone(&self.current),
            stop_requested: Arc::clone(&self.stop_requested),
            decoder: Arc::clone(&self.decoder),
            actuator: Arc::clone(&self.actuator),
            sink: Arc::clone(&self.sink),
            frame_interval: self.settings.frame_interval,
        };
        std::thread::Builder::new()
            .name("video-ingest".to_string())
            .spawn(move || capture.run())
            .map_err(|source| {
                if let Some(device) = self.current.take() {
                    device.release();
                }
                let e = ConnectionError::Spawn {
                    device: format!("video device {device_index}"),
                    source,
                };
                self.status.error(format!("Failed to open video device: {e}"));
                e
            })
    }

    /// Stops the current capture, if any.
    ///
    /// Returns `true` if a capture was stopped.
    pub fn stop(&self) -> bool {
        let Some(source) = self.current.take() else {
            return false;
        };
        self.status
            .info(format!("End video capture from {}", source.device_name()));
        self.stop_requested.store(true, Ordering::SeqCst);
        source.release();
        true
    }

    pub fn is_running(&self) -> bool {
        !self.current.is_empty()
    }
}

/// Returns the indices in `0..max_index` that open and deliver a frame.
///
/// Every probed device is released before the next one is tried.
pub fn probe_devices(opener: &dyn VideoOpener, max_index: u32, resolution: (u32, u32)) -> Vec<u32> {
    let mut found = Vec::new();
    for index in 0..max_index {
        let Ok(source) = opener.open(index, resolution) else {
            continue;
        };
        if source.read_frame().is_ok() {
            found.push(index);
        }
        source.release();
    }
    debug!(?found, "probed video devices");
    found
}

// ── Capture thread ────────────────────────────────────────────────────────────

struct Capture {
    source: Arc<dyn VideoSource>,
    slot: Arc<DeviceSlot<dyn VideoSource>>,
    stop_requested: Arc<AtomicBool>,
    decoder: Arc<MarkerDecoder>,
    actuator: Arc<PointerActuator>,
    sink: Arc<dyn FrameSink>,
    frame_interval: Duration,
}

impl Capture {
    fn is_active(&self) -> bool {
        !self.stop_requested.load(Ordering::SeqCst) && self.slot.is_current(&self.source)
    }

    fn run(self) {
        let name = self.source.device_name().to_string();
        info!(device = %name, "video capture started");

        while self.is_active() {
            match self.source.read_frame() {
                Ok(frame) => self.handle_frame(&frame),
                Err(VideoError::ReadFailed(reason)) => {
                    warn!(device = %name, "frame read failed, retrying... ({reason})");
                }
                Err(VideoError::Closed) => {
                    info!(device = %name, "video device closed");
                    break;
                }
            }
            std::thread::sleep(self.frame_interval);
        }

        info!(device = %name, "video capture stopped");
    }

    fn handle_frame(&self, frame: &RgbImage) {
        self.sink.show_frame(frame);
        let Some((x, y)) = self.decoder.decode(frame) else {
            return;
        };
        // Rejections are already logged by the actuator.
        if let Ok(target) =
            self.actuator
                .move_to_point(i64::from(x), i64::from(y), SpeedTier::Interactive)
        {
            debug!(x = target.x(), y = target.y(), "pointer moved from markers");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
