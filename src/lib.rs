//! # Reel-Maker
//!
//! Turn stock-photo search results into vertical short-form video reels.
//!
//! The pipeline has three stages that hand off through the filesystem:
//! images are searched and downloaded, center-cropped to 9:16 at 1080x1920,
//! then encoded into a fixed-length H.264 slideshow.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reel_maker::{config::Config, pipeline::ReelPipeline};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.apply_env(); // picks up PEXELS_API_KEY
//! config.validate()?;
//!
//! let report = ReelPipeline::new(config).run().await;
//! if let Some(reel) = report.reel() {
//!     println!("{} images -> {:?}", reel.image_count, reel.path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`fetch`] - Photo search and streaming downloads
//! - [`crop`] - Aspect-ratio crop math and the directory cropper
//! - [`reel`] - Slideshow timeline and FFmpeg encoding
//! - [`pipeline`] - Runs the stages in order
//! - [`config`] - Configuration management
//!
//! Stages can also be used on their own:
//!
//! ```rust,no_run
//! use reel_maker::crop::{AspectRatio, ImageCropper};
//!
//! # fn main() -> reel_maker::Result<()> {
//! let cropper = ImageCropper::new(AspectRatio::REEL, ImageCropper::REEL_SIZE);
//! let report = cropper.crop_directory("images", "cropped_videos")?;
//! println!("{} cropped, {} failed", report.cropped.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crop;
pub mod error;
pub mod fetch;
pub mod images;
pub mod pipeline;
pub mod reel;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{ReelError, Result},
    pipeline::{PipelineReport, ReelPipeline},
};
