use image::{GrayImage, RgbImage};
use std::path::PathBuf;
use std::time::Instant;

use crate::error::{ProcessingError, Result};
use crate::models::{BenchmarkResult, PipelineParams};
use crate::processing::preprocessing::is_empty_raster;
use crate::processing::steps::{BlurStep, GrayscaleStep, edge_step};

/// Cap on per-run records kept for the JSON report; the average covers every run.
pub const MAX_RECORDED_SAMPLES: usize = 1024;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory receiving one image per stage
    pub output_dir: PathBuf,
}

/// Context available to all pipeline stages
#[derive(Clone, Debug)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// A single-channel stage: consumes one raster, produces a new one
pub trait PipelineStage {
    fn process(&self, input: &GrayImage, context: &PipelineContext) -> Result<GrayImage>;

    /// Human-readable name (used in logs and debug file names)
    fn name(&self) -> &str;
}

/// Outcome of [`Pipeline::run_repeated`]
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    /// Edge raster from the final repetition
    pub edges: GrayImage,
    /// Field-wise mean over all repetitions
    pub average: BenchmarkResult,
    /// Per-repetition records in run order, at most [`MAX_RECORDED_SAMPLES`]
    pub samples: Vec<BenchmarkResult>,
    pub runs: u32,
}

/// Grayscale -> Gaussian blur -> edge detection, with per-stage timing
pub struct Pipeline {
    params: PipelineParams,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a pipeline with default parameters
    pub fn new() -> Self {
        Self {
            params: PipelineParams::default(),
            context: PipelineContext { debug: None },
        }
    }

    pub fn with_params(mut self, params: PipelineParams) -> Self {
        self.params = params;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        let debug_error = |reason: String| ProcessingError::DebugOutput {
            path: output_dir.clone(),
            reason,
        };

        if output_dir.exists() {
            let mut entries = std::fs::read_dir(&output_dir).map_err(|e| debug_error(e.to_string()))?;
            if entries.next().is_some() {
                return Err(debug_error("directory is not empty".to_string()));
            }
        } else {
            std::fs::create_dir_all(&output_dir).map_err(|e| debug_error(e.to_string()))?;
        }

        self.context.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Run grayscale, blur and edge detection once, filling `out_bench`.
    ///
    /// Each stage is timed on its own and `total_ms` is measured around the
    /// whole sequence. An empty input fails before any clock is read.
    pub fn process_with_benchmark(
        &self,
        input: &RgbImage,
        out_bench: &mut BenchmarkResult,
    ) -> Result<GrayImage> {
        if is_empty_raster(input) {
            return Err(ProcessingError::invalid_input("Input image is empty."));
        }

        let grayscale = GrayscaleStep;
        let blur = BlurStep {
            kernel_size: self.params.blur_kernel,
        };
        let edge = edge_step(&self.params);

        let t0 = Instant::now();

        let g0 = Instant::now();
        let gray = grayscale.process(input, &self.context)?;
        out_bench.grayscale_ms = elapsed_ms(g0);

        let b0 = Instant::now();
        let blurred = blur.process(&gray, &self.context)?;
        out_bench.blur_ms = elapsed_ms(b0);

        let e0 = Instant::now();
        let edges = edge.process(&blurred, &self.context)?;
        out_bench.edge_ms = elapsed_ms(e0);

        out_bench.total_ms = elapsed_ms(t0);

        tracing::debug!(
            "{}: {:.3} ms, {}: {:.3} ms, {}: {:.3} ms, total {:.3} ms",
            grayscale.name(),
            out_bench.grayscale_ms,
            blur.name(),
            out_bench.blur_ms,
            edge.name(),
            out_bench.edge_ms,
            out_bench.total_ms
        );

        Ok(edges)
    }

    /// Run the pipeline `runs` times (at least once) and average the timings.
    ///
    /// Only the final repetition's edge raster is kept, and only the first
    /// [`MAX_RECORDED_SAMPLES`] per-run records. The first failure aborts.
    pub fn run_repeated(&self, input: &RgbImage, runs: u32) -> Result<BenchmarkRun> {
        let runs = runs.max(1);
        let mut sum = BenchmarkResult::default();
        let mut samples = Vec::new();
        let mut edges = None;

        for i in 0..runs {
            let mut bench = BenchmarkResult::default();
            let out = self.process_with_benchmark(input, &mut bench)?;
            tracing::debug!("Run {} of {}: {:.3} ms", i + 1, runs, bench.total_ms);

            sum.accumulate(&bench);
            if samples.len() < MAX_RECORDED_SAMPLES {
                samples.push(bench);
            }
            edges = Some(out);
        }

        // runs >= 1, so at least one raster was produced
        let edges = edges.ok_or_else(|| ProcessingError::invalid_input("No pipeline run completed."))?;

        Ok(BenchmarkRun {
            edges,
            average: sum.averaged(runs),
            samples,
            runs,
        })
    }

    /// Untimed pass returning every intermediate raster with its stage name
    pub fn run_stages(&self, input: &RgbImage) -> Result<Vec<(String, GrayImage)>> {
        let grayscale = GrayscaleStep;
        let blur = BlurStep {
            kernel_size: self.params.blur_kernel,
        };
        let edge = edge_step(&self.params);

        let gray = grayscale.process(input, &self.context)?;
        let blurred = blur.process(&gray, &self.context)?;
        let edges = edge.process(&blurred, &self.context)?;

        Ok(vec![
            (grayscale.name().to_string(), gray),
            (blur.name().to_string(), blurred),
            (edge.name().to_string(), edges),
        ])
    }

    /// Save the input and each stage output into the debug directory.
    ///
    /// Returns the written paths; does nothing when debug mode is off.
    pub fn write_debug_outputs(&self, input: &RgbImage) -> Result<Vec<PathBuf>> {
        let Some(debug_config) = self.context.debug.as_ref() else {
            return Ok(Vec::new());
        };
        let dir = &debug_config.output_dir;
        let debug_error = |path: PathBuf, e: image::ImageError| ProcessingError::DebugOutput {
            path,
            reason: e.to_string(),
        };

        let mut written = Vec::new();

        let input_path = dir.join("00_input.png");
        input
            .save(&input_path)
            .map_err(|e| debug_error(input_path.clone(), e))?;
        written.push(input_path);

        for (idx, (name, image)) in self.run_stages(input)?.into_iter().enumerate() {
            let filename = format!("{:02}_{}.png", idx + 1, name.to_lowercase().replace(' ', "_"));
            let path = dir.join(filename);
            image.save(&path).map_err(|e| debug_error(path.clone(), e))?;
            written.push(path);
        }

        tracing::debug!("Debug: saved {} images to {}", written.len(), dir.display());

        Ok(written)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
