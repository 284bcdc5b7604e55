use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    crop::AspectRatio,
    error::{ConfigError, Result},
    fetch::{SearchQuery, DEFAULT_API_BASE, MAX_PER_PAGE},
    reel::ReelParams,
};

/// Environment variable holding the Pexels API key
pub const API_KEY_ENV: &str = "PEXELS_API_KEY";

/// Main configuration for Reel-Maker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo search and download settings
    pub fetch: FetchConfig,

    /// Cropping settings
    pub crop: CropConfig,

    /// Video assembly settings
    pub reel: ReelConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay settings taken from the environment (currently the API key)
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.fetch.api_key = key;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.fetch.validate()?;
        self.crop.validate()?;
        self.reel.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Photo search configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// API key; usually supplied through PEXELS_API_KEY instead
    pub api_key: String,

    /// API root, `/search` is appended
    pub api_base: String,

    /// Search keyword
    pub query: String,

    /// Results per page (1-80)
    pub per_page: u32,

    /// Page number, starting at 1
    pub page: u32,

    /// Where original images are downloaded
    pub download_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            query: "nature".to_string(),
            per_page: 10,
            page: 1,
            download_dir: PathBuf::from("images"),
        }
    }
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_base", &self.api_base)
            .field("query", &self.query)
            .field("per_page", &self.per_page)
            .field("page", &self.page)
            .field("download_dir", &self.download_dir)
            .finish()
    }
}

impl FetchConfig {
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(self.query.clone(), self.per_page, self.page)
    }

    fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(invalid("fetch.query", &self.query).into());
        }

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(invalid("fetch.per_page", self.per_page).into());
        }

        if self.page == 0 {
            return Err(invalid("fetch.page", self.page).into());
        }

        if url::Url::parse(&self.api_base).is_err() {
            return Err(invalid("fetch.api_base", &self.api_base).into());
        }

        Ok(())
    }
}

/// Cropping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Where cropped images are written
    pub output_dir: PathBuf,

    /// Output canvas width in pixels
    pub width: u32,

    /// Output canvas height in pixels
    pub height: u32,

    /// Target aspect ratio
    pub aspect_ratio: AspectRatio,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("cropped_videos"),
            width: 1080,
            height: 1920,
            aspect_ratio: AspectRatio::REEL,
        }
    }
}

impl CropConfig {
    fn validate(&self) -> Result<()> {
        if self.aspect_ratio.width == 0 || self.aspect_ratio.height == 0 {
            return Err(invalid("crop.aspect_ratio", self.aspect_ratio).into());
        }

        // H.264 with yuv420p wants even dimensions
        if self.width == 0 || self.width % 2 != 0 {
            return Err(invalid("crop.width", self.width).into());
        }
        if self.height == 0 || self.height % 2 != 0 {
            return Err(invalid("crop.height", self.height).into());
        }

        Ok(())
    }
}

/// Video assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Output video path
    pub output_path: PathBuf,

    /// Total reel length in seconds
    pub duration: f64,

    /// Encoded frame rate
    pub fps: f64,

    /// FFmpeg encoder
    pub codec: String,

    /// Constant rate factor (0-51)
    pub crf: u8,
}

impl Default for ReelConfig {
    fn default() -> Self {
        let params = ReelParams::default();
        Self {
            output_path: PathBuf::from("reel_video.mp4"),
            duration: params.duration,
            fps: params.fps,
            codec: params.codec,
            crf: params.crf,
        }
    }
}

impl ReelConfig {
    pub fn params(&self) -> ReelParams {
        ReelParams {
            duration: self.duration,
            fps: self.fps,
            codec: self.codec.clone(),
            crf: self.crf,
        }
    }

    fn validate(&self) -> Result<()> {
        self.params()
            .validate()
            .map_err(|e| invalid("reel", e))?;
        Ok(())
    }
}
