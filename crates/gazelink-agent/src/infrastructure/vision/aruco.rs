//! ArUco marker detection through OpenCV's `objdetect` module.
//!
//! Each detected marker is reported with the x position of its first corner
//! (the top-left corner of the marker as printed), which is what the decoder
//! sorts on.

use gazelink_core::{DetectError, MarkerDetector, MarkerDictionary, MarkerObservation};
use image::RgbImage;
use opencv::core::{Point2f, Vector};
use opencv::imgproc;
use opencv::objdetect::{
    self, ArucoDetector, DetectorParameters, PredefinedDictionaryType, RefineParameters,
};
use opencv::prelude::*;
use parking_lot::Mutex;

use crate::infrastructure::video::capture::rgb_to_mat;

fn predefined(dictionary: MarkerDictionary) -> PredefinedDictionaryType {
    match dictionary {
        MarkerDictionary::Aruco4x4_50 => PredefinedDictionaryType::DICT_4X4_50,
        MarkerDictionary::Aruco5x5_100 => PredefinedDictionaryType::DICT_5X5_100,
        MarkerDictionary::Aruco6x6_100 => PredefinedDictionaryType::DICT_6X6_100,
        MarkerDictionary::Aruco7x7_250 => PredefinedDictionaryType::DICT_7X7_250,
    }
}

fn backend(e: opencv::Error) -> DetectError {
    DetectError::Backend(e.to_string())
}

/// [`MarkerDetector`] backed by `cv::aruco::ArucoDetector`.
pub struct ArucoMarkerDetector {
    dictionary: MarkerDictionary,
    detector: Mutex<ArucoDetector>,
}

impl ArucoMarkerDetector {
    /// Builds a detector for `dictionary` with OpenCV's default parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Backend`] if OpenCV cannot build the detector.
    pub fn new(dictionary: MarkerDictionary) -> Result<Self, DetectError> {
        let cv_dictionary =
            objdetect::get_predefined_dictionary(predefined(dictionary)).map_err(backend)?;
        let parameters = DetectorParameters::default().map_err(backend)?;
        let refine = RefineParameters::new(10.0, 3.0, true).map_err(backend)?;
        let detector = ArucoDetector::new(&cv_dictionary, &parameters, refine).map_err(backend)?;
        Ok(Self {
            dictionary,
            detector: Mutex::new(detector),
        })
    }
}

impl MarkerDetector for ArucoMarkerDetector {
    fn dictionary(&self) -> MarkerDictionary {
        self.dictionary
    }

    fn detect(&self, frame: &RgbImage) -> Result<Vec<MarkerObservation>, DetectError> {
        let gray = rgb_to_mat(frame, imgproc::COLOR_RGB2GRAY)
            .map_err(|e| DetectError::Frame(e.to_string()))?;

        let mut corners = Vector::<Vector<Point2f>>::new();
        let mut ids = Vector::<i32>::new();
        let mut rejected = Vector::<Vector<Point2f>>::new();
        self.detector
            .lock()
            .detect_markers(&gray, &mut corners, &mut ids, &mut rejected)
            .map_err(backend)?;

        let mut observations = Vec::with_capacity(ids.len());
        for (marker, id) in corners.iter().zip(ids.iter()) {
            let first = marker.get(0).map_err(backend)?;
            // OpenCV ids are never negative for a successful detection.
            observations.push(MarkerObservation::new(first.x, id.max(0) as u32));
        }
        Ok(observations)
    }
}
