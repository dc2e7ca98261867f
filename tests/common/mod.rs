#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from edgebench for tests
pub use edgebench::{
    BenchmarkResult, EdgeMethod, Pipeline, PipelineParams, ProcessingError, load_image, save_image,
};
