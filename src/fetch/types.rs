use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest page size the Pexels search endpoint accepts
pub const MAX_PER_PAGE: u32 = 80;

/// Extension used when a URL path carries none
const FALLBACK_EXTENSION: &str = "jpg";

/// One page of a keyword search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub per_page: u32,
    pub page: u32,
}

impl SearchQuery {
    /// Build a query, clamping `per_page` to `1..=MAX_PER_PAGE` and `page` to at least 1
    pub fn new<S: Into<String>>(query: S, per_page: u32, page: u32) -> Self {
        let clamped = per_page.clamp(1, MAX_PER_PAGE);
        if clamped != per_page {
            warn!("per_page {} out of range, using {}", per_page, clamped);
        }

        Self {
            query: query.into(),
            per_page: clamped,
            page: page.max(1),
        }
    }

    /// Query-string pairs for the search request
    pub fn params(&self) -> [(&'static str, String); 3] {
        [
            ("query", self.query.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

/// Search endpoint response. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub photos: Vec<Photo>,

    #[serde(default)]
    pub total_results: Option<u64>,

    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Photo {
    pub id: u64,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub photographer: Option<String>,

    #[serde(default)]
    pub alt: Option<String>,

    #[serde(default)]
    pub src: PhotoSources,
}

impl Photo {
    /// One-line summary for logs: `1234 by Jane (4000x6000): "alt text"`
    pub fn describe(&self) -> String {
        let mut text = self.id.to_string();
        if let Some(name) = self.photographer.as_deref().filter(|n| !n.is_empty()) {
            text.push_str(&format!(" by {}", name));
        }
        if let (Some(w), Some(h)) = (self.width, self.height) {
            text.push_str(&format!(" ({}x{})", w, h));
        }
        if let Some(alt) = self.alt.as_deref().filter(|a| !a.is_empty()) {
            text.push_str(&format!(": {:?}", alt));
        }
        text
    }
}

/// Rendition URLs; only the original resolution is downloaded
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PhotoSources {
    #[serde(default)]
    pub original: Option<String>,
}

/// A downloadable image: remote id plus original-resolution URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: u64,
    pub url: String,
    pub extension: String,
}

impl ImageRecord {
    /// `None` when the photo has no usable original URL
    pub fn from_photo(photo: &Photo) -> Option<Self> {
        let url = photo.src.original.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }

        Some(Self {
            id: photo.id,
            url: url.to_string(),
            extension: extension_from_url(url),
        })
    }

    /// `{id}.{ext}`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.extension)
    }
}

/// Extension of the last path segment of `url`, ignoring query and fragment
fn extension_from_url(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
