use edgebench::{EdgeMethod, Pipeline, PipelineParams, load_image};
use std::env;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path> [repeat]", args[0]);
        std::process::exit(1);
    }

    let img = load_image(Path::new(&args[1]))?;
    let repeat: u32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(10);

    println!("Loaded image: {}x{}, {} run(s) per configuration\n", img.width(), img.height(), repeat);
    println!("{:<8} {:>5} {:>12} {:>12} {:>12} {:>12}", "method", "blur", "gray ms", "blur ms", "edge ms", "total ms");

    for method in [EdgeMethod::Canny, EdgeMethod::Sobel] {
        for blur_kernel in [3, 5, 9, 15] {
            let pipeline = Pipeline::new().with_params(PipelineParams {
                method,
                blur_kernel,
                ..Default::default()
            });
            let run = pipeline.run_repeated(&img, repeat)?;
            let avg = run.average;

            println!(
                "{:<8} {:>5} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
                method.name(),
                blur_kernel,
                avg.grayscale_ms,
                avg.blur_ms,
                avg.edge_ms,
                avg.total_ms
            );
        }
    }

    Ok(())
}
