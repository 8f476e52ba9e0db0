//! Live preview window.

use crate::overlay;
use image::RgbImage;
use minifb::{Key, Window, WindowOptions};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("window: {0}")]
    Window(#[from] minifb::Error),
}

/// A preview window. Closed when dropped.
pub struct Display {
    window: Window,
    buffer: Vec<u32>,
}

impl Display {
    pub fn open(title: &str, width: u32, height: u32) -> Result<Self, DisplayError> {
        let window = Window::new(title, width as usize, height as usize, WindowOptions::default())?;
        tracing::debug!(title, width, height, "preview window opened");
        Ok(Self {
            window,
            buffer: Vec::with_capacity(width as usize * height as usize),
        })
    }

    /// Show one frame and pump window events.
    pub fn show(&mut self, image: &RgbImage) -> Result<(), DisplayError> {
        overlay::to_window_buffer(image, &mut self.buffer);
        self.window
            .update_with_buffer(&self.buffer, image.width() as usize, image.height() as usize)?;
        Ok(())
    }

    /// `q` pressed or the window closed.
    pub fn quit_requested(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Q)
    }
}
