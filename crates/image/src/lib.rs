//! Still-image utilities for the jerawat workspace.
//!
//! Converts raw camera frames (YUYV, RGB, MJPEG) into RGB, encodes
//! snapshots as JPEG, and works out the media type of user-chosen files.

pub mod error;
pub use error::*;

mod image;
pub use image::*;

mod jpeg;
pub use jpeg::*;

mod media;
pub use media::*;

mod pixelformat;
pub use pixelformat::*;

mod rgb;
pub use rgb::*;

mod u32;
pub use u32::*;
