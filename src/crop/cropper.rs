use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::GenericImageView;
use tracing::{debug, info, warn};

use crate::crop::geometry::{AspectRatio, CropRegion};
use crate::error::{CropError, Result};
use crate::images;

/// Outcome of cropping a directory
#[derive(Debug, Clone, Default)]
pub struct CropReport {
    /// Files written to the output directory
    pub cropped: Vec<PathBuf>,

    /// Source files that could not be processed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl CropReport {
    pub fn total(&self) -> usize {
        self.cropped.len() + self.failed.len()
    }
}

/// Center-crops images to an aspect ratio and resizes them to a fixed canvas
#[derive(Debug, Clone)]
pub struct ImageCropper {
    aspect_ratio: AspectRatio,
    output_size: (u32, u32),
}

impl ImageCropper {
    /// Reel canvas: 1080x1920
    pub const REEL_SIZE: (u32, u32) = (1080, 1920);

    pub fn new(aspect_ratio: AspectRatio, output_size: (u32, u32)) -> Self {
        Self { aspect_ratio, output_size }
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn output_size(&self) -> (u32, u32) {
        self.output_size
    }

    /// Crop every supported image in `source_dir` into `output_dir`.
    ///
    /// The output directory is created first. A file that fails to decode or
    /// save is logged and recorded in the report; the pass carries on.
    pub fn crop_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source_dir: P,
        output_dir: Q,
    ) -> Result<CropReport> {
        let source_dir = source_dir.as_ref();
        let output_dir = output_dir.as_ref();

        std::fs::create_dir_all(output_dir)?;

        let sources = images::discover_images(source_dir)?;
        debug!("Found {} images in {:?}", sources.len(), source_dir);

        let mut report = CropReport::default();

        for source in sources {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let destination = output_dir.join(file_name);

            match self.crop_file(&source, &destination) {
                Ok(()) => {
                    info!("Cropped and saved: {}", file_name.to_string_lossy());
                    report.cropped.push(destination);
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", file_name.to_string_lossy(), e);
                    report.failed.push((source, e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Crop and resize a single image, writing it to `destination`
    pub fn crop_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        destination: Q,
    ) -> std::result::Result<(), CropError> {
        let source = source.as_ref();
        let destination = destination.as_ref();

        let image = image::open(source).map_err(|e| CropError::DecodeFailed {
            path: source.display().to_string(),
            reason: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        let region = CropRegion::centered(width, height, self.aspect_ratio);
        debug!(
            "{:?}: {}x{} -> crop {}x{} at ({}, {})",
            source, width, height,
            region.width, region.height, region.x, region.y
        );

        let (out_w, out_h) = self.output_size;
        let resized = image
            .crop_imm(region.x, region.y, region.width, region.height)
            .resize_exact(out_w, out_h, FilterType::Lanczos3);

        resized.save(destination).map_err(|e| CropError::SaveFailed {
            path: destination.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl Default for ImageCropper {
    fn default() -> Self {
        Self::new(AspectRatio::REEL, Self::REEL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_image(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_output_is_always_reel_size() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        std::fs::create_dir(&src).unwrap();

        write_image(&src.join("landscape.png"), 320, 180);
        write_image(&src.join("portrait.jpg"), 90, 400);
        write_image(&src.join("square.jpeg"), 64, 64);

        let report = ImageCropper::default().crop_directory(&src, &out).unwrap();
        assert_eq!(report.cropped.len(), 3);
        assert!(report.failed.is_empty());

        for name in ["landscape.png", "portrait.jpg", "square.jpeg"] {
            let cropped = image::open(out.join(name)).unwrap();
            assert_eq!(cropped.dimensions(), (1080, 1920), "{}", name);
        }
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        std::fs::create_dir(&src).unwrap();

        std::fs::write(src.join("a_broken.jpg"), b"definitely not a jpeg").unwrap();
        write_image(&src.join("b_good.png"), 40, 30);
        std::fs::write(src.join("notes.txt"), b"ignored").unwrap();

        let cropper = ImageCropper::new(AspectRatio::REEL, (90, 160));
        let report = cropper.crop_directory(&src, &out).unwrap();

        assert_eq!(report.cropped, vec![out.join("b_good.png")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, src.join("a_broken.jpg"));
        assert_eq!(report.total(), 2);
        assert!(!out.join("a_broken.jpg").exists());
        assert!(!out.join("notes.txt").exists());
    }

    #[test]
    fn test_empty_source_creates_empty_output() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("nested").join("out");
        std::fs::create_dir(&src).unwrap();

        let report = ImageCropper::default().crop_directory(&src, &out).unwrap();
        assert_eq!(report.total(), 0);
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_custom_ratio_and_size() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("in.png");
        let dst = dir.path().join("out.png");
        write_image(&src, 300, 100);

        let cropper = ImageCropper::new(AspectRatio::new(1, 1).unwrap(), (50, 50));
        cropper.crop_file(&src, &dst).unwrap();

        assert_eq!(image::open(&dst).unwrap().dimensions(), (50, 50));
    }
}
