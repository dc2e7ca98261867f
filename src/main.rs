use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

use edgebench::report::{BenchmarkReport, format_summary, write_json_report};
use edgebench::{EdgeMethod, Pipeline, PipelineParams, load_image, save_image};

#[derive(Parser)]
#[command(name = "edgebench")]
#[command(about = "Benchmark grayscale, Gaussian blur and Canny/Sobel edge detection on an image")]
#[command(override_usage = "edgebench --input <path> --output <path> [options]")]
struct Cli {
    /// Path to input image file
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Path to write the edge image to
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Edge method: canny|sobel (anything else selects canny)
    #[arg(long, default_value = "canny")]
    method: String,

    /// Gaussian kernel size (made odd and >= 3)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    blur: i32,

    /// Canny low threshold
    #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
    canny_low: f64,

    /// Canny high threshold
    #[arg(long, default_value_t = 150.0, allow_negative_numbers = true)]
    canny_high: f64,

    /// Sobel kernel size (made odd and >= 3)
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    sobel_ksize: i32,

    /// Repeat processing N times and average the timings (values below 1 run once)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    repeat: i32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save each stage's output to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Write parameters and timings as JSON
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let (Some(input), Some(output)) = (args.input.clone(), args.output.clone()) else {
        // Help text goes to stdout; nothing is processed
        let _ = Cli::command().print_help();
        return ExitCode::from(1);
    };

    match run(&args, input, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Cli, input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    if !EdgeMethod::is_known(&args.method) {
        tracing::warn!("Unknown method '{}', using canny", args.method);
    }

    let params = PipelineParams {
        method: EdgeMethod::from_name(&args.method),
        blur_kernel: args.blur,
        canny_low: args.canny_low,
        canny_high: args.canny_high,
        sobel_ksize: args.sobel_ksize,
    };
    // max(1) makes the value positive, so the cast is lossless
    let repeat = args.repeat.max(1) as u32;

    let img = load_image(&input)?;

    let mut pipeline = Pipeline::new().with_params(params);
    if let Some(debug_dir) = &args.debug_out {
        pipeline = pipeline.with_debug(debug_dir.clone())?;
    }

    tracing::info!(
        "Running {} pipeline {} time(s) on {}x{}",
        params.method.name(),
        repeat,
        img.width(),
        img.height()
    );
    let run = pipeline.run_repeated(&img, repeat)?;

    save_image(&output, &run.edges)?;

    // Intermediates are produced outside the timed runs
    pipeline.write_debug_outputs(&img)?;

    if let Some(report_path) = &args.report_json {
        let report = BenchmarkReport::new(&input, &output, pipeline.params(), &run);
        write_json_report(report_path, &report)?;
    }

    print!("{}", format_summary(&output, run.runs, &run.average));

    Ok(())
}
