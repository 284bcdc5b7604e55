use std::path::PathBuf;

use crate::error::{AssembleError, Result};

/// Reel encoding parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ReelParams {
    /// Total playback length in seconds
    pub duration: f64,

    /// Output frame rate, independent of how long each image is held
    pub fps: f64,

    /// FFmpeg encoder name
    pub codec: String,

    /// Constant rate factor (0-51, lower is better)
    pub crf: u8,
}

impl Default for ReelParams {
    fn default() -> Self {
        Self {
            duration: 20.0,
            fps: 24.0,
            codec: "libx264".to_string(),
            crf: 23,
        }
    }
}

impl ReelParams {
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AssembleError::InvalidParameters {
                details: format!("duration must be positive, got {}", self.duration),
            }.into());
        }

        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(AssembleError::InvalidParameters {
                details: format!("fps must be positive, got {}", self.fps),
            }.into());
        }

        if self.codec.trim().is_empty() {
            return Err(AssembleError::InvalidParameters {
                details: "codec must not be empty".to_string(),
            }.into());
        }

        if self.crf > 51 {
            return Err(AssembleError::InvalidParameters {
                details: format!("crf must be 0-51, got {}", self.crf),
            }.into());
        }

        Ok(())
    }
}

/// One image placed on the reel timeline
#[derive(Debug, Clone, PartialEq)]
pub struct ReelSlot {
    pub path: PathBuf,
    pub start: f64,
    pub hold: f64,
}

/// Ordered images, each held for an equal share of the total duration
#[derive(Debug, Clone)]
pub struct ReelTimeline {
    slots: Vec<ReelSlot>,
    duration: f64,
}

impl ReelTimeline {
    /// Lay `images` out in the order given across `duration` seconds
    pub fn new(images: Vec<PathBuf>, duration: f64) -> Self {
        let hold = if images.is_empty() { 0.0 } else { duration / images.len() as f64 };

        let slots = images
            .into_iter()
            .enumerate()
            .map(|(i, path)| ReelSlot {
                path,
                start: i as f64 * hold,
                hold,
            })
            .collect();

        Self { slots, duration }
    }

    pub fn slots(&self) -> &[ReelSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Seconds each image stays on screen
    pub fn hold_time(&self) -> f64 {
        self.slots.first().map_or(0.0, |slot| slot.hold)
    }

    /// Images shown per second (`image_count / duration`)
    pub fn display_rate(&self) -> f64 {
        if self.duration > 0.0 {
            self.len() as f64 / self.duration
        } else {
            0.0
        }
    }

    /// Number of output frames at `fps`
    pub fn frame_count(&self, fps: f64) -> usize {
        (self.duration * fps).round() as usize
    }
}

/// Represents an encoded reel on disk
#[derive(Debug, Clone)]
pub struct EncodedReel {
    pub path: PathBuf,
    pub duration: f64,
    pub image_count: usize,
    pub frame_count: usize,
    pub file_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_equal_hold_times_sum_to_duration() {
        let timeline = ReelTimeline::new(paths(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]), 20.0);

        assert_eq!(timeline.hold_time(), 5.0);
        assert_eq!(timeline.display_rate(), 0.2);
        let total: f64 = timeline.slots().iter().map(|s| s.hold).sum();
        assert!((total - 20.0).abs() < 1e-9);
        assert_eq!(timeline.slots()[3].start, 15.0);
    }

    #[test]
    fn test_frame_count_at_24_fps() {
        let timeline = ReelTimeline::new(paths(&["a.jpg", "b.jpg", "c.jpg"]), 20.0);
        assert_eq!(timeline.frame_count(24.0), 480);
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = ReelTimeline::new(vec![], 20.0);
        assert!(timeline.is_empty());
        assert_eq!(timeline.hold_time(), 0.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(ReelParams::default().validate().is_ok());
        assert!(ReelParams { duration: 0.0, ..ReelParams::default() }.validate().is_err());
        assert!(ReelParams { fps: f64::NAN, ..ReelParams::default() }.validate().is_err());
        assert!(ReelParams { crf: 52, ..ReelParams::default() }.validate().is_err());
        assert!(ReelParams { codec: String::new(), ..ReelParams::default() }.validate().is_err());
    }
}
