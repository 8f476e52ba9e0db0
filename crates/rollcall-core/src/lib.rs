//! rollcall-core — face detection, encoding and identity matching.
//!
//! Uses SCRFD for face detection and ArcFace for face encoding, both running
//! via ONNX Runtime on the CPU, then names each face by nearest reference.

use std::path::PathBuf;

pub mod alignment;
pub mod detector;
pub mod encoder;
pub mod matcher;
pub mod recognizer;
pub mod reference;
pub mod types;

pub use detector::FaceDetector;
pub use encoder::{EncodeError, FaceEncoder, FacePipeline};
pub use matcher::{Identity, Matcher, NearestMatcher, MATCH_TOLERANCE};
pub use recognizer::FaceRecognizer;
pub use reference::{load_reference_set, ReferenceError, ReferenceSet};
pub use types::{BoundingBox, Detection, Embedding};

/// Default location of the ONNX model files:
/// `$XDG_DATA_HOME/rollcall/models`, else `~/.local/share/rollcall/models`.
pub fn default_model_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local/share")
        })
        .join("rollcall")
        .join("models")
}
