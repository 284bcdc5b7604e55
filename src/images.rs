//! Image file discovery shared by the crop and reel stages.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::Result;

/// Extensions (lower-case) treated as input images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Case-insensitive extension check against [`IMAGE_EXTENSIONS`]
pub fn is_supported_image<P: AsRef<Path>>(path: P) -> bool {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Files with a supported image extension in `directory`, sorted by file name.
///
/// Returns an empty list when the directory does not exist. Subdirectories are
/// not descended into.
pub fn discover_images<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Ok(Vec::new());
    }

    let mut images = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();

        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        } else {
            trace!("Ignoring non-image entry: {:?}", path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extension_allowlist() {
        assert!(is_supported_image("a.jpg"));
        assert!(is_supported_image("a.JPEG"));
        assert!(is_supported_image("dir/b.Png"));
        assert!(!is_supported_image("c.webp"));
        assert!(!is_supported_image("notes.txt"));
        assert!(!is_supported_image("jpg"));
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["b.png", "a.jpg", "10.jpeg", "2.jpg", "readme.md"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let found: Vec<String> = discover_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(found, vec!["10.jpeg", "2.jpg", "a.jpg", "b.png"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let found = discover_images(dir.path().join("nope")).unwrap();
        assert!(found.is_empty());
    }
}
