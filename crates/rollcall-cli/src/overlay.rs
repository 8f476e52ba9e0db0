//! Box-and-label overlay drawn on each displayed frame.

use crate::session::LabeledFace;
use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const BOX_THICKNESS: u32 = 2;
/// Label bar spans `bottom + 5 ..= bottom + 25` below the face box.
const LABEL_OFFSET: u32 = 5;
const LABEL_HEIGHT: u32 = 20;
const LABEL_SCALE: f32 = 16.0;

/// Load the label font. Labels are drawn without text if this fails.
pub fn load_font(path: &Path) -> Option<FontVec> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "label font unavailable; names will not be drawn");
            return None;
        }
    };
    match FontVec::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "label font unreadable; names will not be drawn");
            None
        }
    }
}

/// Colour copy of `frame` with a box and name bar for every face.
pub fn render(frame: &GrayImage, faces: &[LabeledFace], font: Option<&FontVec>) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(frame.clone()).to_rgb8();
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return canvas;
    }

    for face in faces {
        let (left, top, right, bottom) = face.bbox.clamped_corners(w, h);

        for inset in 0..BOX_THICKNESS {
            let x = left + inset;
            let y = top + inset;
            let bw = right.saturating_sub(left + 2 * inset) + 1;
            let bh = bottom.saturating_sub(top + 2 * inset) + 1;
            draw_hollow_rect_mut(&mut canvas, Rect::at(x as i32, y as i32).of_size(bw, bh), BOX_COLOR);
        }

        let bar_top = bottom + LABEL_OFFSET;
        if bar_top >= h {
            continue;
        }
        let bar = Rect::at(left as i32, bar_top as i32)
            .of_size(right.saturating_sub(left) + 1, LABEL_HEIGHT.min(h - bar_top));
        draw_filled_rect_mut(&mut canvas, bar, BOX_COLOR);

        if let Some(font) = font {
            let text = face.identity.to_string();
            draw_text_mut(
                &mut canvas,
                TEXT_COLOR,
                left as i32 + 6,
                bar_top as i32 + 2,
                PxScale::from(LABEL_SCALE),
                font,
                &text,
            );
        }
    }

    canvas
}

/// Pack an RGB image into the `0RGB` u32 layout the window expects.
pub fn to_window_buffer(image: &RgbImage, buffer: &mut Vec<u32>) {
    buffer.clear();
    buffer.extend(
        image
            .pixels()
            .map(|Rgb([r, g, b])| (u32::from(*r) << 16) | (u32::from(*g) << 8) | u32::from(*b)),
    );
}
