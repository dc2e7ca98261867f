pub mod error;
pub mod models;
pub mod pipeline;
pub mod processing;
pub mod report;

pub use error::{ProcessingError, Result};
pub use models::{BenchmarkResult, EdgeMethod, PipelineParams, normalize_kernel_size};
pub use pipeline::{BenchmarkRun, DebugConfig, Pipeline, PipelineContext, PipelineStage};
pub use processing::{load_image, save_image};
