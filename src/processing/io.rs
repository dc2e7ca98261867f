//! Image codec wrappers: decode an input file into a color raster, encode a
//! raster back to disk. Formats are whatever the `image` crate supports; the
//! output format follows the file extension.
use image::{GrayImage, ImageReader, RgbImage};
use std::path::Path;

use super::preprocessing::is_empty_raster;
use crate::error::{ProcessingError, Result};

/// Load an image from disk as a 3-channel color raster.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let load_failure = |reason: String| ProcessingError::LoadFailure {
        path: path.to_path_buf(),
        reason,
    };

    let img = ImageReader::open(path)
        .map_err(|e| load_failure(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| load_failure(e.to_string()))?
        .decode()
        .map_err(|e| load_failure(e.to_string()))?;

    let rgb = img.into_rgb8();
    if is_empty_raster(&rgb) {
        return Err(load_failure("decoded image is empty".to_string()));
    }

    tracing::info!("Loaded {} ({}x{})", path.display(), rgb.width(), rgb.height());
    Ok(rgb)
}

/// Save a single-channel raster. Refuses empty rasters.
pub fn save_image(path: &Path, image: &GrayImage) -> Result<()> {
    let save_failure = |reason: String| ProcessingError::SaveFailure {
        path: path.to_path_buf(),
        reason,
    };

    if is_empty_raster(image) {
        return Err(save_failure("cannot save an empty image".to_string()));
    }

    image.save(path).map_err(|e| save_failure(e.to_string()))?;

    tracing::info!("Saved {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn load_missing_file_is_load_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_image(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, ProcessingError::LoadFailure { .. }));
        assert!(err.to_string().starts_with("Failed to load image"));
    }

    #[test]
    fn load_garbage_is_load_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(matches!(load_image(&path), Err(ProcessingError::LoadFailure { .. })));
    }

    #[test]
    fn save_then_load_gray_raster() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("edges.png");
        let img = GrayImage::from_fn(16, 8, |x, _| Luma([(x * 10) as u8]));

        save_image(&path, &img).unwrap();
        let loaded = load_image(&path).unwrap();

        assert_eq!(loaded.dimensions(), (16, 8));
        assert_eq!(*loaded.get_pixel(3, 2), Rgb([30, 30, 30]));
    }

    #[test]
    fn save_empty_raster_is_save_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        let err = save_image(&path, &GrayImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, ProcessingError::SaveFailure { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn save_unknown_extension_is_save_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("edges.notaformat");
        let err = save_image(&path, &GrayImage::new(4, 4)).unwrap_err();
        assert!(matches!(err, ProcessingError::SaveFailure { .. }));
    }
}
