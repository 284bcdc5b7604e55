use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Target aspect ratio expressed as width:height.
///
/// Serialized as `"9:16"`; a `{ width, height }` table is accepted on input too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AspectRatioRepr", into = "String")]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Vertical 9:16, the short-form video format
    pub const REEL: AspectRatio = AspectRatio { width: 9, height: 16 };

    pub fn new(width: u32, height: u32) -> Result<Self, CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidAspectRatio {
                details: format!("{}:{} has a zero component", width, height),
            });
        }
        Ok(Self { width, height })
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::REEL
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CropError::InvalidAspectRatio {
            details: format!("expected W:H, got '{}'", s),
        };

        let (w, h) = s.split_once(':').ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Self::new(width, height)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AspectRatioRepr {
    Text(String),
    Table { width: u32, height: u32 },
}

impl TryFrom<AspectRatioRepr> for AspectRatio {
    type Error = CropError;

    fn try_from(repr: AspectRatioRepr) -> Result<Self, Self::Error> {
        match repr {
            AspectRatioRepr::Text(text) => text.parse(),
            AspectRatioRepr::Table { width, height } => Self::new(width, height),
        }
    }
}

impl From<AspectRatio> for String {
    fn from(ratio: AspectRatio) -> Self {
        ratio.to_string()
    }
}

/// Rectangle to cut out of a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Largest region of `ratio` that fits inside a `src_width` x `src_height`
    /// image, centered on both axes.
    ///
    /// Full width is tried first; when the matching height would overflow the
    /// source, the region falls back to full height instead.
    pub fn centered(src_width: u32, src_height: u32, ratio: AspectRatio) -> Self {
        let (rw, rh) = (ratio.width as u64, ratio.height as u64);

        let mut width = src_width as u64;
        let mut height = width * rh / rw;

        if height > src_height as u64 {
            height = src_height as u64;
            width = height * rw / rh;
        }

        // Degenerate sources (1px strips) still get a non-empty region
        let width = (width as u32).clamp(1, src_width.max(1));
        let height = (height as u32).clamp(1, src_height.max(1));

        Self {
            x: src_width.saturating_sub(width) / 2,
            y: src_height.saturating_sub(height) / 2,
            width,
            height,
        }
    }
}
