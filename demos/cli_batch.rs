//! Batch CLI for binder_scan with JSON configuration
//!
//! Splits every supported image in a directory, one output folder per page.
//! A page that fails is reported and the batch moves on.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use binder_scan::image_loader::is_supported_extension;
use binder_scan::SplitterConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cli_batch", about = "Split every binder page in a directory")]
struct Args {
    /// JSON splitter configuration (see generate_config)
    config: PathBuf,

    /// Directory of binder page photos
    input_dir: PathBuf,

    /// Directory receiving one subfolder per page
    output_dir: PathBuf,
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

    let config = match SplitterConfig::from_json_file(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config file: {}", e);
            process::exit(1);
        }
    };

    let splitter = match config.build() {
        Ok(splitter) => splitter,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            process::exit(1);
        }
    };

    eprintln!("Loaded configuration from {}", args.config.display());
    eprintln!("Method: {}", config.method);
    eprintln!();

    let image_files = match find_image_files(&args.input_dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input_dir.display(), e);
            process::exit(1);
        }
    };

    if image_files.is_empty() {
        eprintln!("No image files found in {}", args.input_dir.display());
        process::exit(1);
    }

    eprintln!("Found {} image files to process", image_files.len());
    eprintln!();

    let mut total_cards = 0usize;
    let mut failed = 0usize;
    for (index, image_path) in image_files.iter().enumerate() {
        let stem = image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("page");
        let page_dir = args.output_dir.join(stem);

        eprint!("[{}/{}] {} ... ", index + 1, image_files.len(), image_path.display());
        match splitter.try_split(image_path, &page_dir) {
            Ok(paths) => {
                eprintln!("{} card(s)", paths.len());
                total_cards += paths.len();
            }
            Err(e) => {
                eprintln!("failed: {}", e);
                failed += 1;
            }
        }
    }

    eprintln!();
    eprintln!(
        "Done: {} card(s) from {} page(s), {} failure(s)",
        total_cards,
        image_files.len() - failed,
        failed
    );
}

/// Supported images directly inside `dir`, sorted by name
fn find_image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(is_supported_extension)
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
