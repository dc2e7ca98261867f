use image::{GenericImageView, GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::{separable_filter, separable_filter_equal};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::error::{ProcessingError, Result};
use crate::models::normalize_kernel_size;

/// Largest Sobel aperture accepted after normalization.
pub const MAX_SOBEL_KERNEL_SIZE: u32 = 31;

/// Largest Gaussian kernel side accepted after normalization.
pub const MAX_BLUR_KERNEL_SIZE: u32 = 4095;

/// Weights used to blend |gx| and |gy| into the Sobel magnitude.
const SOBEL_WEIGHT_X: f32 = 0.5;
const SOBEL_WEIGHT_Y: f32 = 0.5;
const SOBEL_OFFSET: f32 = 0.0;

/// Single-channel raster with signed, unclipped samples
pub type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// True when the raster has no pixels
pub fn is_empty_raster<I: GenericImageView>(img: &I) -> bool {
    let (width, height) = img.dimensions();
    width == 0 || height == 0
}

/// Convert image to grayscale with the fixed Rec. 709 luma weights
/// (0.2126, 0.7152, 0.0722)
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// 1-D Gaussian weights for a `size`-tap kernel with the spread derived from the size.
///
/// Sizes 1, 3, 5 and 7 use the fixed binomial tables; larger sizes sample a
/// Gaussian with `sigma = 0.3 * ((size - 1) / 2 - 1) + 0.8` and normalize to sum 1.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    match size {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
            let scale = -0.5 / (sigma * sigma);
            let center = (size as f64 - 1.0) * 0.5;

            let weights: Vec<f64> = (0..size)
                .map(|i| {
                    let x = i as f64 - center;
                    (scale * x * x).exp()
                })
                .collect();
            let sum: f64 = weights.iter().sum();

            weights.into_iter().map(|w| (w / sum) as f32).collect()
        }
    }
}

/// Apply a `k x k` Gaussian blur, `k` normalized to odd and >= 3
pub fn apply_blur(img: &GrayImage, kernel_size: i32) -> Result<GrayImage> {
    if is_empty_raster(img) {
        return Err(ProcessingError::invalid_input("Grayscale image is empty."));
    }
    let size = normalize_kernel_size(kernel_size);
    if size > MAX_BLUR_KERNEL_SIZE {
        return Err(ProcessingError::invalid_input(format!(
            "Gaussian kernel size {size} exceeds the maximum of {MAX_BLUR_KERNEL_SIZE}"
        )));
    }
    let kernel = gaussian_kernel(size);

    // Filter at f32 so the result is rounded rather than truncated back to u8
    let blurred = separable_filter_equal(&widen(img), &kernel);
    Ok(narrow_rounded(&blurred))
}

/// Check Canny hysteresis thresholds: both non-negative, `high >= low`.
pub fn validate_canny_thresholds(low: f64, high: f64) -> Result<()> {
    // Written so NaN fails every comparison and is rejected
    if low >= 0.0 && high >= 0.0 && high >= low {
        Ok(())
    } else {
        Err(ProcessingError::invalid_input(format!(
            "Invalid Canny thresholds (low={low}, high={high})"
        )))
    }
}

/// Detect edges using Canny edge detector.
///
/// `imageproc::edges::canny` smooths with its own sigma 1.4 Gaussian before
/// taking gradients, on top of the blur stage.
pub fn canny_edges(img: &GrayImage, low_threshold: f64, high_threshold: f64) -> Result<GrayImage> {
    if is_empty_raster(img) {
        return Err(ProcessingError::invalid_input("Blurred image is empty."));
    }
    validate_canny_thresholds(low_threshold, high_threshold)?;

    Ok(canny(img, low_threshold as f32, high_threshold as f32))
}

/// Derivative and smoothing taps of the extended Sobel operator of side `size`.
///
/// The smoothing taps are the binomial row of order `size - 1`; the
/// derivative taps are the binomial row of order `size - 2` differenced once.
pub fn sobel_kernels(size: u32) -> (Vec<f32>, Vec<f32>) {
    let size = size.max(3) as usize;

    let smooth = binomial_row(size - 1);
    let base = binomial_row(size - 2);
    let deriv = (0..size)
        .map(|i| {
            let left = if i > 0 { base[i - 1] } else { 0.0 };
            let right = base.get(i).copied().unwrap_or(0.0);
            left - right
        })
        .collect::<Vec<f64>>();

    (
        deriv.into_iter().map(|v| v as f32).collect(),
        smooth.into_iter().map(|v| v as f32).collect(),
    )
}

/// Sobel gradient magnitude: `0.5 * |gx| + 0.5 * |gy|`, saturated to 8 bits
pub fn sobel_edges(img: &GrayImage, kernel_size: i32) -> Result<GrayImage> {
    if is_empty_raster(img) {
        return Err(ProcessingError::invalid_input("Blurred image is empty."));
    }
    let size = normalize_kernel_size(kernel_size);
    if size > MAX_SOBEL_KERNEL_SIZE {
        return Err(ProcessingError::invalid_input(format!(
            "Sobel kernel size {size} exceeds the maximum of {MAX_SOBEL_KERNEL_SIZE}"
        )));
    }

    let (grad_x, grad_y) = if size == 3 {
        (widen(&horizontal_sobel(img)), widen(&vertical_sobel(img)))
    } else {
        let (deriv, smooth) = sobel_kernels(size);
        let src = widen(img);
        (
            separable_filter(&src, &deriv, &smooth),
            separable_filter(&src, &smooth, &deriv),
        )
    };

    Ok(combine_gradients(&grad_x, &grad_y))
}

fn combine_gradients(grad_x: &FloatImage, grad_y: &FloatImage) -> GrayImage {
    GrayImage::from_fn(grad_x.width(), grad_x.height(), |x, y| {
        let abs_x = saturate(grad_x.get_pixel(x, y)[0].abs());
        let abs_y = saturate(grad_y.get_pixel(x, y)[0].abs());
        let blended = SOBEL_WEIGHT_X * abs_x + SOBEL_WEIGHT_Y * abs_y + SOBEL_OFFSET;
        Luma([saturate(blended) as u8])
    })
}

fn binomial_row(order: usize) -> Vec<f64> {
    let mut row = vec![1.0f64];
    for _ in 0..order {
        let mut next = vec![1.0f64; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

/// Round to nearest and clamp into the u8 range
fn saturate(v: f32) -> f32 {
    v.round().clamp(0.0, 255.0)
}

fn widen<I>(img: &I) -> FloatImage
where
    I: GenericImageView,
    I::Pixel: image::Pixel,
    <I::Pixel as image::Pixel>::Subpixel: Into<f32>,
{
    FloatImage::from_fn(img.width(), img.height(), |x, y| {
        let sample = image::Pixel::channels(&img.get_pixel(x, y))[0];
        Luma([sample.into()])
    })
}

fn narrow_rounded(img: &FloatImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([saturate(img.get_pixel(x, y)[0]) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn step_image(width: u32, height: u32, split: u32, high: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([if x < split { 0 } else { high }]))
    }

    #[test]
    fn grayscale_keeps_dimensions() {
        let rgb = RgbImage::from_pixel(12, 7, Rgb([10, 200, 30]));
        let gray = to_grayscale(&rgb);
        assert_eq!(gray.dimensions(), (12, 7));
    }

    #[test]
    fn gaussian_kernels_are_normalized_and_symmetric() {
        for size in [3u32, 5, 7, 9, 11, 15, 31] {
            let kernel = gaussian_kernel(size);
            assert_eq!(kernel.len(), size as usize);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "size {size} sums to {sum}");
            for i in 0..kernel.len() / 2 {
                assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn blur_preserves_uniform_image() {
        let gray = GrayImage::from_pixel(20, 10, Luma([200]));
        for k in [1, 4, 5, 9] {
            let blurred = apply_blur(&gray, k).unwrap();
            assert_eq!(blurred.dimensions(), (20, 10));
            assert!(blurred.pixels().all(|p| p[0] == 200), "kernel {k}");
        }
    }

    #[test]
    fn blur_rejects_oversized_kernel_before_allocating() {
        let gray = GrayImage::from_pixel(4, 4, Luma([10]));
        let err = apply_blur(&gray, i32::MAX).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("Gaussian kernel size"));
        assert!(apply_blur(&gray, MAX_BLUR_KERNEL_SIZE as i32 + 1).unwrap_err().is_invalid_input());
    }

    #[test]
    fn grayscale_uses_rec709_weights() {
        let gray = to_grayscale(&RgbImage::from_pixel(1, 1, Rgb([0, 255, 0])));
        assert_eq!(gray.get_pixel(0, 0)[0], 182);
        let gray = to_grayscale(&RgbImage::from_pixel(1, 1, Rgb([255, 0, 0])));
        assert_eq!(gray.get_pixel(0, 0)[0], 54);
    }

    #[test]
    fn blur_rejects_empty_raster() {
        let err = apply_blur(&GrayImage::new(0, 0), 5).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn canny_threshold_validation() {
        assert!(validate_canny_thresholds(50.0, 150.0).is_ok());
        assert!(validate_canny_thresholds(0.0, 0.0).is_ok());
        assert!(validate_canny_thresholds(200.0, 100.0).unwrap_err().is_invalid_input());
        assert!(validate_canny_thresholds(-1.0, 100.0).unwrap_err().is_invalid_input());
        assert!(validate_canny_thresholds(10.0, -1.0).unwrap_err().is_invalid_input());
        assert!(validate_canny_thresholds(f64::NAN, 100.0).is_err());
    }

    #[test]
    fn canny_finds_step_edge() {
        let img = step_image(32, 32, 16, 255);
        let edges = canny_edges(&img, 50.0, 150.0).unwrap();
        assert_eq!(edges.dimensions(), (32, 32));
        assert!(edges.pixels().any(|p| p[0] == 255));
        assert!(edges.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn canny_message_names_thresholds() {
        let img = step_image(8, 8, 4, 255);
        let err = canny_edges(&img, 200.0, 100.0).unwrap_err();
        assert!(err.to_string().contains("Invalid Canny thresholds"));
    }

    #[test]
    fn sobel_kernel_taps() {
        assert_eq!(sobel_kernels(3), (vec![-1.0, 0.0, 1.0], vec![1.0, 2.0, 1.0]));
        assert_eq!(
            sobel_kernels(5),
            (vec![-1.0, -2.0, 0.0, 2.0, 1.0], vec![1.0, 4.0, 6.0, 4.0, 1.0])
        );
        let (deriv, smooth) = sobel_kernels(7);
        assert_eq!(deriv, vec![-1.0, -4.0, -5.0, 0.0, 5.0, 4.0, 1.0]);
        assert_eq!(smooth, vec![1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0]);
    }

    #[test]
    fn sobel_of_uniform_image_is_zero() {
        let gray = GrayImage::from_pixel(9, 9, Luma([90]));
        for k in [3, 5, 7] {
            let edges = sobel_edges(&gray, k).unwrap();
            assert!(edges.pixels().all(|p| p[0] == 0), "kernel {k}");
        }
    }

    #[test]
    fn sobel_step_edge_blends_half_of_saturated_gradient() {
        let img = step_image(10, 6, 5, 200);
        for k in [2, 3, 5] {
            let edges = sobel_edges(&img, k).unwrap();
            assert_eq!(edges.dimensions(), (10, 6));
            // |gx| saturates at 255, |gy| is 0 along a vertical step
            assert_eq!(edges.get_pixel(4, 3)[0], 128, "kernel {k}");
            assert_eq!(edges.get_pixel(5, 3)[0], 128, "kernel {k}");
            assert_eq!(edges.get_pixel(0, 3)[0], 0, "kernel {k}");
            assert_eq!(edges.get_pixel(9, 3)[0], 0, "kernel {k}");
        }
    }

    #[test]
    fn sobel_rejects_oversized_kernel() {
        let img = step_image(10, 10, 5, 200);
        assert!(sobel_edges(&img, 31).is_ok());
        assert!(sobel_edges(&img, 33).unwrap_err().is_invalid_input());
    }
}
