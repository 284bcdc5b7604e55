//! # Fetch Module
//!
//! Keyword search against the Pexels photo API and streaming download of the
//! original-resolution images.

pub mod client;
pub mod types;

pub use client::{FetchReport, PhotoFetcher, DEFAULT_API_BASE, DOWNLOAD_CHUNK_SIZE};
pub use types::{ImageRecord, Photo, SearchQuery, SearchResponse, MAX_PER_PAGE};
