//! Command-line interface for binder_scan
//!
//! Splits one binder page with either method and writes the cards into a
//! fresh run folder, so parameter sweeps never overwrite each other.

use std::path::PathBuf;
use std::process;

use binder_scan::{ContourParams, GridParams, SplitMethod, SplitterConfig};
use chrono::Local;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cli", about = "Split a binder page photo into card images")]
struct Args {
    /// Binder page photo
    image: PathBuf,

    /// Splitting method: grid or contour
    #[arg(short, long, default_value = "contour")]
    method: SplitMethod,

    /// Base directory for run folders
    #[arg(short, long, default_value = "test_output")]
    output_base: PathBuf,

    /// Run name; a timestamp is appended
    #[arg(long)]
    run_name: Option<String>,

    /// Grid: percentage trimmed from each side of every cell
    #[arg(long, default_value_t = 5)]
    crop_percent: u8,

    /// Contour: Gaussian blur kernel width (odd)
    #[arg(long, default_value_t = 5)]
    blur_width: u32,

    /// Contour: Gaussian blur kernel height (odd)
    #[arg(long, default_value_t = 5)]
    blur_height: u32,

    /// Contour: Canny lower threshold
    #[arg(long, default_value_t = 50.0)]
    canny_low: f32,

    /// Contour: Canny upper threshold
    #[arg(long, default_value_t = 150.0)]
    canny_high: f32,

    /// Contour: minimum card area as a fraction of the page
    #[arg(long, default_value_t = 0.01)]
    min_area: f64,

    /// Contour: maximum card area as a fraction of the page
    #[arg(long, default_value_t = 0.15)]
    max_area: f64,

    /// Contour: minimum width/height ratio
    #[arg(long, default_value_t = 0.6)]
    min_aspect: f64,

    /// Contour: maximum width/height ratio
    #[arg(long, default_value_t = 0.85)]
    max_aspect: f64,

    /// Contour: polygon approximation factor of the perimeter
    #[arg(long, default_value_t = 0.02)]
    epsilon: f64,

    /// Contour: row grouping tolerance as a fraction of page height
    #[arg(long, default_value_t = 0.1)]
    row_tolerance: f64,

    /// Skip writing the contour debug overlay
    #[arg(long)]
    no_debug_img: bool,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if !args.image.exists() {
        eprintln!("Error: File '{}' does not exist", args.image.display());
        process::exit(1);
    }

    let config = match args.method {
        SplitMethod::Grid => SplitterConfig::grid(GridParams::with_inner_crop(args.crop_percent)),
        SplitMethod::Contour => SplitterConfig::contour(ContourParams {
            blur_kernel: (args.blur_width, args.blur_height),
            canny_low_threshold: args.canny_low,
            canny_high_threshold: args.canny_high,
            min_area_ratio: args.min_area,
            max_area_ratio: args.max_area,
            min_aspect_ratio: args.min_aspect,
            max_aspect_ratio: args.max_aspect,
            poly_approx_epsilon: args.epsilon,
            row_tolerance_ratio: args.row_tolerance,
            save_debug_image: !args.no_debug_img,
            ..ContourParams::default()
        }),
    };

    let splitter = match config.build() {
        Ok(splitter) => splitter,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            process::exit(1);
        }
    };

    let run_dir = args.output_base.join(run_folder_name(&args));
    eprintln!("Processing: {}", args.image.display());
    eprintln!("Method: {}", args.method);
    eprintln!("Output: {}", run_dir.display());
    eprintln!();

    match splitter.try_split(&args.image, &run_dir) {
        Ok(paths) => {
            for path in &paths {
                println!("{}", path.display());
            }
            eprintln!();
            eprintln!("Extracted {} card(s)", paths.len());
            if paths.is_empty() {
                eprintln!("No cards found; try the other method or loosen the filters");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            process::exit(1);
        }
    }
}

/// Folder name for one run, unique per second
fn run_folder_name(args: &Args) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    if let Some(name) = &args.run_name {
        return format!("{}_{}", name, timestamp);
    }

    match args.method {
        SplitMethod::Grid => format!("run_{}_grid_crop{}", timestamp, args.crop_percent),
        SplitMethod::Contour => format!(
            "run_{}_contour_blur{}x{}_canny{}-{}",
            timestamp, args.blur_width, args.blur_height, args.canny_low, args.canny_high
        ),
    }
}
