//! Camera capture and preview window through OpenCV.
//!
//! OpenCV delivers frames as BGR `Mat`s; everything above this module works
//! with `image::RgbImage`, so frames are converted on the way in and back
//! again for the preview window.

use std::sync::Arc;

use image::RgbImage;
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::prelude::*;
use opencv::{highgui, imgproc, videoio};
use parking_lot::Mutex;
use tracing::debug;

use crate::application::device::ConnectionError;
use crate::application::video_ingest::{FrameSink, VideoError, VideoOpener, VideoSource};

/// Converts a BGR `Mat` into an RGB image.
///
/// # Errors
///
/// Returns the OpenCV error if the conversion fails.
pub fn mat_to_rgb(bgr: &Mat) -> opencv::Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
    let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
    let bytes = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, bytes).ok_or_else(|| {
        opencv::Error::new(
            opencv::core::StsUnmatchedSizes,
            format!("frame buffer does not fit {width}x{height}"),
        )
    })
}

/// Converts an RGB image into a `Mat` with the given OpenCV colour code
/// applied (e.g. `COLOR_RGB2BGR` or `COLOR_RGB2GRAY`).
///
/// # Errors
///
/// Returns the OpenCV error if allocation or conversion fails.
pub fn rgb_to_mat(frame: &RgbImage, code: i32) -> opencv::Result<Mat> {
    let mut rgb = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    rgb.data_bytes_mut()?.copy_from_slice(frame.as_raw());
    let mut converted = Mat::default();
    imgproc::cvt_color(&rgb, &mut converted, code, 0)?;
    Ok(converted)
}

// ── Capture ───────────────────────────────────────────────────────────────────

/// Opens cameras through `cv::VideoCapture`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvOpener;

impl VideoOpener for OpenCvOpener {
    fn open(
        &self,
        index: u32,
        resolution: (u32, u32),
    ) -> Result<Arc<dyn VideoSource>, ConnectionError> {
        let device = format!("camera {index}");
        let open_error = |reason: String| ConnectionError::Open {
            device: device.clone(),
            reason,
        };

        let mut capture = videoio::VideoCapture::new(index as i32, videoio::CAP_ANY)
            .map_err(|e| open_error(e.to_string()))?;
        if !capture.is_opened().map_err(|e| open_error(e.to_string()))? {
            return Err(open_error("device did not open".to_string()));
        }
        // The driver may pick a different mode; that is not an error.
        let _ = capture.set(videoio::CAP_PROP_FRAME_WIDTH, f64::from(resolution.0));
        let _ = capture.set(videoio::CAP_PROP_FRAME_HEIGHT, f64::from(resolution.1));
        debug!(index, ?resolution, "video capture opened");

        Ok(Arc::new(OpenCvSource {
            name: device,
            capture: Mutex::new(Some(capture)),
        }))
    }
}

/// An open `cv::VideoCapture`.
pub struct OpenCvSource {
    name: String,
    capture: Mutex<Option<videoio::VideoCapture>>,
}

impl VideoSource for OpenCvSource {
    fn device_name(&self) -> &str {
        &self.name
    }

    fn read_frame(&self) -> Result<RgbImage, VideoError> {
        let mut guard = self.capture.lock();
        let capture = guard.as_mut().ok_or(VideoError::Closed)?;
        let mut frame = Mat::default();
        let ok = capture
            .read(&mut frame)
            .map_err(|e| VideoError::ReadFailed(e.to_string()))?;
        if !ok || frame.empty() {
            return Err(VideoError::ReadFailed("empty frame".to_string()));
        }
        mat_to_rgb(&frame).map_err(|e| VideoError::ReadFailed(e.to_string()))
    }

    fn release(&self) {
        if let Some(mut capture) = self.capture.lock().take() {
            if let Err(e) = capture.release() {
                debug!(device = %self.name, "release failed: {e}");
            }
        }
    }
}

// ── Preview window ────────────────────────────────────────────────────────────

/// Shows every frame in a HighGUI window.
pub struct PreviewWindow {
    title: String,
}

impl PreviewWindow {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

impl FrameSink for PreviewWindow {
    fn show_frame(&self, frame: &RgbImage) {
        let shown = rgb_to_mat(frame, imgproc::COLOR_RGB2BGR)
            .and_then(|bgr| highgui::imshow(&self.title, &bgr))
            .and_then(|()| highgui::wait_key(1).map(|_| ()));
        if let Err(e) = shown {
            debug!(window = %self.title, "preview failed: {e}");
        }
    }
}
