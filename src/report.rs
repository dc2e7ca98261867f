//! Human-readable summary and JSON dump of a benchmark run.
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{ProcessingError, Result};
use crate::models::{BenchmarkResult, PipelineParams};
use crate::pipeline::BenchmarkRun;

/// Serializable form of a completed benchmark
#[derive(Debug, Serialize)]
pub struct BenchmarkReport<'a> {
    pub input: String,
    pub output: String,
    pub params: &'a PipelineParams,
    pub runs: u32,
    pub average: BenchmarkResult,
    pub samples: &'a [BenchmarkResult],
}

impl<'a> BenchmarkReport<'a> {
    pub fn new(input: &Path, output: &Path, params: &'a PipelineParams, run: &'a BenchmarkRun) -> Self {
        Self {
            input: input.display().to_string(),
            output: output.display().to_string(),
            params,
            runs: run.runs,
            average: run.average,
            samples: &run.samples,
        }
    }
}

/// The stdout summary: output path, run count, then one line per averaged timing
pub fn format_summary(output: &Path, runs: u32, avg: &BenchmarkResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "Saved edges to: {}", output.display());
    let _ = writeln!(out, "Benchmark (avg over {runs} run(s)):");
    let _ = writeln!(out, "  grayscale: {} ms", avg.grayscale_ms);
    let _ = writeln!(out, "  blur:      {} ms", avg.blur_ms);
    let _ = writeln!(out, "  edge:      {} ms", avg.edge_ms);
    let _ = writeln!(out, "  total:     {} ms", avg.total_ms);
    out
}

/// Pretty-print the report as JSON to `path`
pub fn write_json_report(path: &Path, report: &BenchmarkReport<'_>) -> Result<()> {
    let report_error = |reason: String| ProcessingError::Report {
        path: path.to_path_buf(),
        reason,
    };

    let json = serde_json::to_string_pretty(report).map_err(|e| report_error(e.to_string()))?;
    fs::write(path, json).map_err(|e| report_error(e.to_string()))?;

    tracing::info!("Report written to {}", path.display());
    Ok(())
}
