use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;
use tempfile::NamedTempFile;

/// A dark 100x100 image with a bright square in the middle.
pub fn square_image() -> RgbImage {
    ImageBuffer::from_fn(100, 100, |x, y| {
        if (25..75).contains(&x) && (25..75).contains(&y) {
            Rgb([240u8, 230u8, 220u8])
        } else {
            Rgb([15u8, 20u8, 30u8])
        }
    })
}

/// Creates a 100x100 test image and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image() -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    save_test_image(file.path());
    file
}

/// Writes the square test image to `path` as PNG.
pub fn save_test_image(path: &Path) {
    square_image()
        .save_with_format(path, image::ImageFormat::Png)
        .expect("Failed to save test image");
}
