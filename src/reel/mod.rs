//! # Reel Module
//!
//! Lays cropped images out on an equal-share timeline and encodes them into a
//! single H.264 video.

pub mod assembler;
pub mod types;

pub use assembler::{write_concat_list, ReelAssembler};
pub use types::{EncodedReel, ReelParams, ReelSlot, ReelTimeline};
