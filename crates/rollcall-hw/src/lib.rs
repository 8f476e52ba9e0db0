//! rollcall-hw — Hardware abstraction for webcam capture.
//!
//! Provides V4L2-based camera access and conversion of raw capture buffers
//! into grayscale frames.

pub mod camera;
pub mod frame;

pub use camera::{Camera, CameraError, FrameStream};
pub use frame::{Frame, FrameError, PixelFormat};
