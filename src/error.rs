use thiserror::Error;

/// Main error type for the Reel-Maker library
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Crop error: {0}")]
    Crop(#[from] CropError),

    #[error("Assembly error: {0}")]
    Assemble(#[from] AssembleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while talking to the photo search API
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No API key configured (set PEXELS_API_KEY or fetch.api_key)")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API endpoint: {url}")]
    InvalidEndpoint { url: String },

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Per-image cropping errors
#[derive(Error, Debug)]
pub enum CropError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeFailed { path: String, reason: String },

    #[error("Failed to save image {path}: {reason}")]
    SaveFailed { path: String, reason: String },

    #[error("Invalid aspect ratio: {details}")]
    InvalidAspectRatio { details: String },
}

/// Video assembly errors
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("FFmpeg not found. Please install FFmpeg.")]
    FfmpegNotFound,

    #[error("FFmpeg has no '{codec}' encoder")]
    EncoderUnavailable { codec: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Invalid reel parameters: {details}")]
    InvalidParameters { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ReelError
pub type Result<T> = std::result::Result<T, ReelError>;

impl ReelError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is likely transient (rerunning may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Fetch(FetchError::Network(e)) => {
                e.is_timeout() || e.is_connect() || e.status().map_or(false, |s| s.is_server_error())
            }
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(FetchError::MissingApiKey) => {
                "No Pexels API key found. Export PEXELS_API_KEY or set fetch.api_key in the config file.".to_string()
            }
            Self::Fetch(FetchError::Network(e)) if e.status().map_or(false, |s| s.as_u16() == 401) => {
                "The photo API rejected the API key (401 Unauthorized).".to_string()
            }
            Self::Assemble(AssembleError::FfmpegNotFound) => {
                "FFmpeg was not found on PATH. Install it to assemble reels.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_missing_key() {
        let err: ReelError = FetchError::MissingApiKey.into();
        assert!(err.user_message().contains("PEXELS_API_KEY"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_errors_are_recoverable() {
        let err: ReelError = std::io::Error::new(std::io::ErrorKind::Interrupted, "interrupted").into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_generic_falls_back_to_display() {
        let err = ReelError::generic("boom");
        assert_eq!(err.user_message(), "Generic error: boom");
    }
}
