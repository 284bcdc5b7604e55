//! # Pipeline
//!
//! Sequences the fetch, crop and assemble stages over the filesystem.

pub mod engine;

pub use engine::{PipelineReport, ReelPipeline, StageOutcome};
