//! Generate a default splitter configuration file
//!
//! Creates a JSON config with every parameter at its default, ready to be
//! edited and passed to cli_batch.

use std::{env, path::Path, process};

use binder_scan::SplitterConfig;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} configs/default.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = SplitterConfig::default();

    match config.to_json_file(output_path) {
        Ok(()) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!("  Method: {}", config.method);
            eprintln!("  Grid: inner crop {}%", config.grid.inner_crop_percent);
            eprintln!(
                "  Contour: blur {}x{}, Canny ({:.0}, {:.0}), area {:.0}%-{:.0}%, aspect {:.2}-{:.2}",
                config.contour.blur_kernel.0,
                config.contour.blur_kernel.1,
                config.contour.canny_low_threshold,
                config.contour.canny_high_threshold,
                config.contour.min_area_ratio * 100.0,
                config.contour.max_area_ratio * 100.0,
                config.contour.min_aspect_ratio,
                config.contour.max_aspect_ratio,
            );
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
