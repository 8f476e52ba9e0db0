use std::path::PathBuf;

const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Runtime configuration, loaded from environment variables.
///
/// With nothing set, the defaults read `./photos`, write `./attendance.csv`
/// and use the first V4L2 camera.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of reference photos, one per person.
    pub photos_dir: PathBuf,
    /// Attendance CSV file.
    pub ledger_path: PathBuf,
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,
    /// TrueType font for name labels.
    pub font_path: PathBuf,
}

impl Config {
    /// Load configuration from `ROLLCALL_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        Self {
            photos_dir: path("ROLLCALL_PHOTOS_DIR", PathBuf::from("photos")),
            ledger_path: path("ROLLCALL_LEDGER_PATH", PathBuf::from("attendance.csv")),
            camera_device: lookup("ROLLCALL_CAMERA_DEVICE").unwrap_or_else(|| "/dev/video0".to_string()),
            model_dir: path("ROLLCALL_MODEL_DIR", rollcall_core::default_model_dir()),
            font_path: path("ROLLCALL_FONT_PATH", PathBuf::from(DEFAULT_FONT_PATH)),
        }
    }
}
