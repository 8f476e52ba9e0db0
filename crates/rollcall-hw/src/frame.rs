//! Frame type and raw buffer conversion.

use image::GrayImage;

/// Fraction of near-black pixels above which a frame counts as dark.
pub const DARK_FRAME_THRESHOLD: f32 = 0.95;

/// Pixel formats the camera can negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// YUYV 4:2:2 packed (2 bytes/pixel, extract Y channel).
    Yuyv,
    /// 8-bit grayscale.
    Grey,
    /// 16-bit little-endian grayscale.
    Y16,
}

impl PixelFormat {
    /// Bytes needed for one `width`×`height` frame in this format.
    pub fn frame_len(self, width: u32, height: u32) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            PixelFormat::Grey => pixels,
            PixelFormat::Yuyv | PixelFormat::Y16 => pixels * 2,
        }
    }

    /// Convert a raw capture buffer to an 8-bit grayscale image.
    pub fn to_grayscale(self, buf: &[u8], width: u32, height: u32) -> Result<GrayImage, FrameError> {
        let expected = self.frame_len(width, height);
        if buf.len() < expected {
            return Err(FrameError::InvalidLength {
                format: self,
                expected,
                actual: buf.len(),
            });
        }
        let buf = &buf[..expected];

        let gray: Vec<u8> = match self {
            PixelFormat::Grey => buf.to_vec(),
            // [Y0, U, Y1, V]: luma is every even byte.
            PixelFormat::Yuyv => buf.iter().step_by(2).copied().collect(),
            // Keep the high byte of each little-endian sample.
            PixelFormat::Y16 => buf.chunks_exact(2).map(|px| px[1]).collect(),
        };

        GrayImage::from_raw(width, height, gray).ok_or(FrameError::InvalidLength {
            format: self,
            expected,
            actual: buf.len(),
        })
    }
}

/// A captured grayscale camera frame.
#[derive(Clone)]
pub struct Frame {
    pub image: GrayImage,
    pub sequence: u32,
    pub is_dark: bool,
}

/// True if more than `threshold_pct` of pixels are near black (< 32).
pub fn is_dark_frame(gray: &[u8], threshold_pct: f32) -> bool {
    if gray.is_empty() {
        return true;
    }
    let dark = gray.iter().filter(|&&p| p < 32).count();
    (dark as f32 / gray.len() as f32) > threshold_pct
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("{format:?} buffer too short: expected {expected}, got {actual}")]
    InvalidLength {
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
}
