//! Per-frame work: encode faces, name them, log first sightings.

use anyhow::{Context, Result};
use image::GrayImage;
use rollcall_core::{BoundingBox, Detection, FaceEncoder, Identity, Matcher, ReferenceSet};
use rollcall_ledger::{AttendanceLedger, LedgerError};

/// A face to draw: where it is and who it is.
#[derive(Debug, Clone)]
pub struct LabeledFace {
    pub bbox: BoundingBox,
    pub identity: Identity,
}

/// Name every detection and forward each identity to the ledger.
pub fn process_detections<M: Matcher + ?Sized>(
    detections: Vec<Detection>,
    references: &ReferenceSet,
    matcher: &M,
    ledger: &mut AttendanceLedger,
) -> Result<Vec<LabeledFace>, LedgerError> {
    let mut labeled = Vec::with_capacity(detections.len());

    for Detection { bbox, embedding } in detections {
        let identity = matcher.identify(&embedding, references);
        if let Some(record) = ledger.mark(&identity)? {
            println!("Marked attendance for {} at {}", record.name, record.timestamp);
        }
        labeled.push(LabeledFace { bbox, identity });
    }

    Ok(labeled)
}

/// Encode one frame and run [`process_detections`] on the result.
pub fn process_frame<E, M>(
    frame: &GrayImage,
    encoder: &mut E,
    references: &ReferenceSet,
    matcher: &M,
    ledger: &mut AttendanceLedger,
) -> Result<Vec<LabeledFace>>
where
    E: FaceEncoder + ?Sized,
    M: Matcher + ?Sized,
{
    let detections = encoder.encode(frame).context("encoding faces in frame")?;
    tracing::trace!(faces = detections.len(), "frame encoded");
    let labeled = process_detections(detections, references, matcher, ledger)
        .context("writing attendance")?;
    Ok(labeled)
}

/// Counts consecutive frames skipped for darkness.
///
/// The first frame of each dark stretch is logged at info level so that a
/// person missing from the ledger can be traced back to lighting.
#[derive(Debug, Default)]
pub struct DarkFrames {
    run: u64,
}

impl DarkFrames {
    /// Record a skipped frame. Returns true if it starts a new dark stretch.
    pub fn skip(&mut self, sequence: u32) -> bool {
        self.run += 1;
        if self.run == 1 {
            tracing::info!(seq = sequence, "frame too dark, face detection paused");
            true
        } else {
            tracing::debug!(seq = sequence, run = self.run, "dark frame, skipping detection");
            false
        }
    }

    /// Record a lit frame, ending any dark stretch.
    pub fn lit(&mut self) {
        if self.run > 0 {
            tracing::info!(skipped = self.run, "lighting recovered, face detection resumed");
            self.run = 0;
        }
    }
}
