use anyhow::{Context, Result};
use clap::Parser;
use rollcall_core::{load_reference_set, FacePipeline, NearestMatcher};
use rollcall_hw::Camera;
use rollcall_ledger::AttendanceLedger;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod overlay;
mod session;

use config::Config;
use display::Display;

const WINDOW_TITLE: &str = "Webcam Face Recognition";

#[derive(Parser)]
#[command(name = "rollcall", version, about = "Webcam face recognition attendance logger")]
struct Cli {
    /// Directory of reference photos; each file stem is a person's name
    #[arg(long)]
    photos: Option<PathBuf>,
    /// Attendance CSV file
    #[arg(long)]
    ledger: Option<PathBuf>,
    /// V4L2 camera device
    #[arg(long)]
    camera: Option<String>,
    /// Directory containing det_10g.onnx and w600k_r50.onnx
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(photos) = self.photos {
            config.photos_dir = photos;
        }
        if let Some(ledger) = self.ledger {
            config.ledger_path = ledger;
        }
        if let Some(camera) = self.camera {
            config.camera_device = camera;
        }
        if let Some(model_dir) = self.model_dir {
            config.model_dir = model_dir;
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Cli::parse().apply(Config::from_env());
    tracing::debug!(?config, "configuration resolved");

    let mut pipeline = FacePipeline::load(&config.model_dir)
        .with_context(|| format!("loading face models from {}", config.model_dir.display()))?;

    let references = load_reference_set(&config.photos_dir, &mut pipeline)
        .context("loading reference photos")?;

    let mut ledger = AttendanceLedger::new(&config.ledger_path);
    ledger.ensure_ready().context("preparing attendance ledger")?;

    let camera = match Camera::open(&config.camera_device) {
        Ok(camera) => camera,
        Err(e) => {
            tracing::error!(device = %config.camera_device, error = %e, "camera open failed");
            println!("Error: Camera not accessible.");
            return Ok(());
        }
    };
    let mut frames = match camera.stream() {
        Ok(frames) => frames,
        Err(e) => {
            tracing::error!(device = %config.camera_device, error = %e, "camera stream failed");
            println!("Error: Camera not accessible.");
            return Ok(());
        }
    };

    let mut display = Display::open(WINDOW_TITLE, camera.width, camera.height)?;
    let font = overlay::load_font(&config.font_path);

    let mut dark_frames = session::DarkFrames::default();

    println!("Press 'q' to quit.");

    loop {
        let frame = match frames.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "frame capture failed");
                println!("Failed to grab frame");
                break;
            }
        };

        let faces = if frame.is_dark {
            dark_frames.skip(frame.sequence);
            Vec::new()
        } else {
            dark_frames.lit();
            session::process_frame(&frame.image, &mut pipeline, &references, &NearestMatcher, &mut ledger)?
        };

        let canvas = overlay::render(&frame.image, &faces, font.as_ref());
        display.show(&canvas)?;

        if display.quit_requested() {
            break;
        }
    }

    tracing::info!(marked = ledger.marked_count(), "session ended");
    Ok(())
}
