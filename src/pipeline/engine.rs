use std::fmt;

use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    crop::{CropReport, ImageCropper},
    error::{ReelError, Result},
    fetch::{FetchReport, PhotoFetcher},
    reel::{EncodedReel, ReelAssembler},
};

/// How a single pipeline stage ended
#[derive(Debug)]
pub enum StageOutcome<T> {
    Completed(T),
    Failed(String),
    Skipped,
}

impl<T> StageOutcome<T> {
    fn from_result(stage: &str, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(e) => {
                error!("An error occurred during {}: {}", stage, e.user_message());
                debug!("{} error detail: {:?}", stage, e);
                if e.is_recoverable() {
                    warn!("The {} failure looks transient; rerunning may succeed", stage);
                }
                Self::Failed(e.to_string())
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> fmt::Display for StageOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(_) => write!(f, "completed"),
            Self::Failed(reason) => write!(f, "failed ({})", reason),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Per-stage results of one pipeline run
#[derive(Debug)]
pub struct PipelineReport {
    pub fetch: StageOutcome<FetchReport>,
    pub crop: StageOutcome<CropReport>,
    /// `Completed(None)` when there was nothing to assemble
    pub assemble: StageOutcome<Option<EncodedReel>>,
}

impl PipelineReport {
    pub fn reel(&self) -> Option<&EncodedReel> {
        self.assemble.completed().and_then(Option::as_ref)
    }
}

/// Runs fetch -> crop -> assemble, one stage after the other.
///
/// Each stage reads the directory its predecessor wrote. A stage failure is
/// logged and recorded in the report; later stages still run and simply work
/// with whatever files exist.
pub struct ReelPipeline {
    config: Config,
}

impl ReelPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run all three stages
    pub async fn run(&self) -> PipelineReport {
        self.run_with(true).await
    }

    /// Run crop and assemble against images already downloaded
    pub async fn run_offline(&self) -> PipelineReport {
        self.run_with(false).await
    }

    async fn run_with(&self, fetch: bool) -> PipelineReport {
        info!("🎬 Starting Reel-Maker pipeline");
        info!("   Query: {:?}", self.config.fetch.query);
        info!("   Downloads: {:?}", self.config.fetch.download_dir);
        info!("   Cropped: {:?}", self.config.crop.output_dir);
        info!("   Output: {:?}", self.config.reel.output_path);

        let fetch = if fetch {
            StageOutcome::from_result("fetch", self.fetch_images().await)
        } else {
            info!("📥 Step 1: Fetch skipped");
            StageOutcome::Skipped
        };

        let crop = StageOutcome::from_result("crop", self.crop_images().await);
        let assemble = StageOutcome::from_result("assembly", self.assemble_reel().await);

        info!("🏁 Pipeline finished: fetch {}, crop {}, assemble {}", fetch, crop, assemble);
        PipelineReport { fetch, crop, assemble }
    }

    // ==========================================
    // STEP 1: FETCH
    // ==========================================

    async fn fetch_images(&self) -> Result<FetchReport> {
        info!("📥 Step 1: Fetching images...");
        let fetch_config = &self.config.fetch;

        tokio::fs::create_dir_all(&fetch_config.download_dir).await?;
        let fetcher = PhotoFetcher::with_base_url(fetch_config.api_key.as_str(), fetch_config.api_base.as_str())?;
        let report = fetcher
            .fetch(&fetch_config.search_query(), &fetch_config.download_dir)
            .await?;

        info!("   ✅ Downloaded {} of {} listed photos", report.downloaded.len(), report.listed);
        Ok(report)
    }

    // ==========================================
    // STEP 2: CROP
    // ==========================================

    async fn crop_images(&self) -> Result<CropReport> {
        let crop_config = self.config.crop.clone();
        let source_dir = self.config.fetch.download_dir.clone();

        let cropper = ImageCropper::new(crop_config.aspect_ratio, (crop_config.width, crop_config.height));
        let (width, height) = cropper.output_size();
        info!("✂️  Step 2: Cropping images to {} at {}x{}...", cropper.aspect_ratio(), width, height);
        let report = tokio::task::spawn_blocking(move || cropper.crop_directory(&source_dir, &crop_config.output_dir))
            .await
            .map_err(|e| ReelError::generic(format!("Crop task panicked: {}", e)))??;

        info!("   ✅ Cropped {} images ({} failed)", report.cropped.len(), report.failed.len());
        Ok(report)
    }

    // ==========================================
    // STEP 3: ASSEMBLE
    // ==========================================

    async fn assemble_reel(&self) -> Result<Option<EncodedReel>> {
        info!("🎞️  Step 3: Assembling reel...");
        let reel_config = &self.config.reel;

        let assembler = ReelAssembler::new(reel_config.params());
        let encoded = assembler
            .assemble(&self.config.crop.output_dir, &reel_config.output_path)
            .await?;

        if let Some(reel) = &encoded {
            info!("   ✅ Reel ready:");
            info!("      File: {:?}", reel.path);
            info!("      Duration: {:.1}s ({} images)", reel.duration, reel.image_count);
            info!("      Frames: {}", reel.frame_count);
            info!("      Size: {:.1} MB", reel.file_size as f64 / 1024.0 / 1024.0);
        }

        Ok(encoded)
    }
}
