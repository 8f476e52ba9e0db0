//! The detection + encoding seam.
//!
//! Both the reference loader and the capture loop only need "give me every
//! face in this image with its feature vector". [`FaceEncoder`] is that
//! boundary, so either side can run against a fake in tests.

use crate::detector::{DetectorError, FaceDetector};
use crate::recognizer::{FaceRecognizer, RecognizerError};
use crate::types::Detection;
use image::GrayImage;
use std::path::Path;
use thiserror::Error;

/// SCRFD detection model file name inside the model directory.
pub const DETECTOR_MODEL_FILE: &str = "det_10g.onnx";
/// ArcFace recognition model file name inside the model directory.
pub const RECOGNIZER_MODEL_FILE: &str = "w600k_r50.onnx";

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),
}

/// Finds faces in an image and encodes each one.
pub trait FaceEncoder {
    /// All faces in `image`, most confident first.
    fn encode(&mut self, image: &GrayImage) -> Result<Vec<Detection>, EncodeError>;
}

/// SCRFD detection followed by ArcFace encoding.
pub struct FacePipeline {
    detector: FaceDetector,
    recognizer: FaceRecognizer,
}

impl FacePipeline {
    /// Load both models from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self, EncodeError> {
        let detector = FaceDetector::load(&model_dir.join(DETECTOR_MODEL_FILE))?;
        let recognizer = FaceRecognizer::load(&model_dir.join(RECOGNIZER_MODEL_FILE))?;
        Ok(Self { detector, recognizer })
    }
}

impl FaceEncoder for FacePipeline {
    fn encode(&mut self, image: &GrayImage) -> Result<Vec<Detection>, EncodeError> {
        let faces = self.detector.detect(image)?;
        let mut detections = Vec::with_capacity(faces.len());

        for bbox in faces {
            match self.recognizer.extract(image, &bbox) {
                Ok(embedding) => detections.push(Detection { bbox, embedding }),
                Err(RecognizerError::NoLandmarks) => {
                    tracing::debug!(confidence = bbox.confidence, "skipping face without landmarks");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(detections)
    }
}
