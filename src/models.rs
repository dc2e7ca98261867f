use serde::Serialize;

/// Smallest kernel side accepted by the blur and Sobel stages.
pub const MIN_KERNEL_SIZE: u32 = 3;

/// Wall-clock timings for one pipeline run, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub grayscale_ms: f64,
    pub blur_ms: f64,
    pub edge_ms: f64,
    pub total_ms: f64,
}

impl BenchmarkResult {
    /// Add another run's timings field by field
    pub fn accumulate(&mut self, other: &BenchmarkResult) {
        self.grayscale_ms += other.grayscale_ms;
        self.blur_ms += other.blur_ms;
        self.edge_ms += other.edge_ms;
        self.total_ms += other.total_ms;
    }

    /// Divide every field by `runs` (treated as at least 1)
    pub fn averaged(&self, runs: u32) -> BenchmarkResult {
        let n = runs.max(1) as f64;
        BenchmarkResult {
            grayscale_ms: self.grayscale_ms / n,
            blur_ms: self.blur_ms / n,
            edge_ms: self.edge_ms / n,
            total_ms: self.total_ms / n,
        }
    }
}

/// Edge detector used by the last pipeline stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMethod {
    #[default]
    Canny,
    Sobel,
}

impl EdgeMethod {
    /// Resolve a method name. Anything other than "sobel" selects Canny.
    pub fn from_name(name: &str) -> Self {
        match name {
            "sobel" => EdgeMethod::Sobel,
            _ => EdgeMethod::Canny,
        }
    }

    /// Whether `name` is one of the recognized method names
    pub fn is_known(name: &str) -> bool {
        matches!(name, "canny" | "sobel")
    }

    pub fn name(&self) -> &'static str {
        match self {
            EdgeMethod::Canny => "canny",
            EdgeMethod::Sobel => "sobel",
        }
    }
}

/// Tunables for the grayscale -> blur -> edge pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineParams {
    pub method: EdgeMethod,
    /// Gaussian kernel side, normalized with [`normalize_kernel_size`] before use
    pub blur_kernel: i32,
    pub canny_low: f64,
    pub canny_high: f64,
    /// Sobel kernel side, normalized with [`normalize_kernel_size`] before use
    pub sobel_ksize: i32,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            method: EdgeMethod::Canny,
            blur_kernel: 5,
            canny_low: 50.0,
            canny_high: 150.0,
            sobel_ksize: 3,
        }
    }
}

/// Force a kernel size to be odd and at least 3.
pub fn normalize_kernel_size(k: i32) -> u32 {
    let mut k = k.max(MIN_KERNEL_SIZE as i32) as u32;
    if k % 2 == 0 {
        k += 1;
    }
    k
}
