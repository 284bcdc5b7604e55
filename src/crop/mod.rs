//! # Crop Module
//!
//! Center-crops downloaded images to a target aspect ratio and resizes them to
//! the reel canvas.

pub mod cropper;
pub mod geometry;

pub use cropper::{CropReport, ImageCropper};
pub use geometry::{AspectRatio, CropRegion};
