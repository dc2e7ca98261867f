use crate::error::{ProcessingError, Result};
use crate::models::{EdgeMethod, PipelineParams, normalize_kernel_size};
use crate::pipeline::{PipelineContext, PipelineStage};
use crate::processing::preprocessing;
use image::{GrayImage, RgbImage};

/// Convert a color raster to grayscale.
///
/// Not a [`PipelineStage`]: it is the only step whose input is color.
pub struct GrayscaleStep;

impl GrayscaleStep {
    pub fn process(&self, input: &RgbImage, _context: &PipelineContext) -> Result<GrayImage> {
        if preprocessing::is_empty_raster(input) {
            return Err(ProcessingError::invalid_input("Input image is empty."));
        }
        Ok(preprocessing::to_grayscale(input))
    }

    pub fn name(&self) -> &str {
        "Grayscale"
    }
}

/// Apply Gaussian blur
pub struct BlurStep {
    pub kernel_size: i32,
}

impl PipelineStage for BlurStep {
    fn process(&self, input: &GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        tracing::debug!(
            "Blur kernel {} -> {}",
            self.kernel_size,
            normalize_kernel_size(self.kernel_size)
        );
        preprocessing::apply_blur(input, self.kernel_size)
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Detect edges using Canny
pub struct CannyStep {
    pub low_threshold: f64,
    pub high_threshold: f64,
}

impl PipelineStage for CannyStep {
    fn process(&self, input: &GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        preprocessing::canny_edges(input, self.low_threshold, self.high_threshold)
    }

    fn name(&self) -> &str {
        "Canny Edges"
    }
}

/// Sobel gradient magnitude
pub struct SobelStep {
    pub kernel_size: i32,
}

impl PipelineStage for SobelStep {
    fn process(&self, input: &GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        tracing::debug!(
            "Sobel kernel {} -> {}",
            self.kernel_size,
            normalize_kernel_size(self.kernel_size)
        );
        preprocessing::sobel_edges(input, self.kernel_size)
    }

    fn name(&self) -> &str {
        "Sobel Edges"
    }
}

/// Build the edge stage selected by `params.method`
pub fn edge_step(params: &PipelineParams) -> Box<dyn PipelineStage> {
    match params.method {
        EdgeMethod::Canny => Box::new(CannyStep {
            low_threshold: params.canny_low,
            high_threshold: params.canny_high,
        }),
        EdgeMethod::Sobel => Box::new(SobelStep {
            kernel_size: params.sobel_ksize,
        }),
    }
}
