use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{AssembleError, ReelError, Result};
use crate::images;
use crate::reel::types::{EncodedReel, ReelParams, ReelTimeline};

/// Encodes a directory of still images into a slideshow video with FFmpeg
pub struct ReelAssembler {
    params: ReelParams,
    ffmpeg: PathBuf,
}

impl ReelAssembler {
    pub fn new(params: ReelParams) -> Self {
        Self {
            params,
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }

    /// Use a specific ffmpeg executable instead of the one on PATH
    pub fn with_ffmpeg<P: Into<PathBuf>>(mut self, ffmpeg: P) -> Self {
        self.ffmpeg = ffmpeg.into();
        self
    }

    pub async fn check_ffmpeg_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Whether `ffmpeg -encoders` lists `codec`
    pub async fn encoder_available(&self, codec: &str) -> bool {
        let output = match Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-encoders"])
            .stderr(Stdio::null())
            .output()
            .await
        {
            Ok(output) if output.status.success() => output,
            _ => return false,
        };

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .any(|name| name == codec)
    }

    /// Build a reel from every supported image in `source_dir`, ordered by file name.
    ///
    /// Returns `Ok(None)` without touching `output_path` when there are no images.
    pub async fn assemble<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source_dir: P,
        output_path: Q,
    ) -> Result<Option<EncodedReel>> {
        let source_dir = source_dir.as_ref().to_path_buf();
        let images = tokio::task::spawn_blocking(move || images::discover_images(source_dir))
            .await
            .map_err(|e| ReelError::generic(format!("Image discovery task panicked: {}", e)))??;
        self.assemble_images(images, output_path).await
    }

    /// Build a reel from `images` in the order given
    pub async fn assemble_images<Q: AsRef<Path>>(
        &self,
        images: Vec<PathBuf>,
        output_path: Q,
    ) -> Result<Option<EncodedReel>> {
        let output_path = output_path.as_ref();

        if images.is_empty() {
            info!("No images found to create a video.");
            return Ok(None);
        }

        self.params.validate()?;

        let timeline = ReelTimeline::new(images, self.params.duration);
        info!(
            "Assembling {} images: {:.2}s each ({:.3} images/s), {} fps",
            timeline.len(),
            timeline.hold_time(),
            timeline.display_rate(),
            self.params.fps
        );
        for slot in timeline.slots() {
            debug!("  {:>8.3}s +{:.3}s  {}", slot.start, slot.hold, slot.path.display());
        }

        if !self.check_ffmpeg_available().await {
            return Err(AssembleError::FfmpegNotFound.into());
        }
        if !self.encoder_available(&self.params.codec).await {
            return Err(AssembleError::EncoderUnavailable {
                codec: self.params.codec.clone(),
            }.into());
        }

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let work_dir = tempfile::Builder::new().prefix("reel_maker_").tempdir()?;
        let list_path = work_dir.path().join("images.txt");
        let list_timeline = timeline.clone();
        let list_file = list_path.clone();
        tokio::task::spawn_blocking(move || write_concat_list(&list_timeline, &list_file))
            .await
            .map_err(|e| ReelError::generic(format!("Concat list task panicked: {}", e)))??;

        self.encode(&list_path, output_path).await?;

        let metadata = tokio::fs::metadata(output_path).await?;
        let encoded = EncodedReel {
            path: output_path.to_path_buf(),
            duration: timeline.duration(),
            image_count: timeline.len(),
            frame_count: timeline.frame_count(self.params.fps),
            file_size: metadata.len(),
        };

        info!("Video created: {}", output_path.display());
        Ok(Some(encoded))
    }

    async fn encode(&self, list_path: &Path, output_path: &Path) -> Result<()> {
        let args = self.encode_args(list_path, output_path);
        debug!("Running {} {}", self.ffmpeg.display(), args.join(" "));

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .stdout(Stdio::null())
            .output()
            .await
            .map_err(|e| AssembleError::EncodingFailed {
                reason: format!("FFmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssembleError::EncodingFailed {
                reason: format!("FFmpeg failed: {}", stderr.trim()),
            }.into());
        }

        Ok(())
    }

    fn encode_args(&self, list_path: &Path, output_path: &Path) -> Vec<String> {
        let params = &self.params;
        vec![
            "-hide_banner".into(),
            "-loglevel".into(), "error".into(),
            "-f".into(), "concat".into(),
            "-safe".into(), "0".into(),
            "-i".into(), list_path.display().to_string(),
            // yuv420p needs even dimensions
            "-vf".into(), "scale=trunc(iw/2)*2:trunc(ih/2)*2".into(),
            "-c:v".into(), params.codec.clone(),
            "-r".into(), params.fps.to_string(),
            "-pix_fmt".into(), "yuv420p".into(),
            "-crf".into(), params.crf.to_string(),
            "-t".into(), format!("{:.6}", params.duration),
            "-movflags".into(), "+faststart".into(),
            "-y".into(),
            output_path.display().to_string(),
        ]
    }
}

impl Default for ReelAssembler {
    fn default() -> Self {
        Self::new(ReelParams::default())
    }
}

/// Write an FFmpeg concat-demuxer script holding each image for its slot.
///
/// The last image is listed twice; the demuxer ignores the final `duration`
/// directive otherwise.
pub fn write_concat_list(timeline: &ReelTimeline, list_path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(list_path)?);

    for slot in timeline.slots() {
        writeln!(file, "file '{}'", escape_concat_path(&absolute(&slot.path)))?;
        writeln!(file, "duration {:.6}", slot.hold)?;
    }

    if let Some(last) = timeline.slots().last() {
        writeln!(file, "file '{}'", escape_concat_path(&absolute(&last.path)))?;
    }

    file.flush()?;
    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Quote a path for a single-quoted concat `file` directive
fn escape_concat_path(path: &Path) -> String {
    path.display().to_string().replace('\'', r"'\''")
}
