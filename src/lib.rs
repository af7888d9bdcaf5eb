//! # Binder Scan
//!
//! A Rust crate for splitting photographed trading-card binder pages into
//! one image per card.
//!
//! This library extracts cards by:
//! - Dividing the page into a fixed 3x3 pocket grid, or
//! - Detecting card outlines with edge and contour analysis
//! - Skipping empty pockets by their low grayscale variance
//! - Writing crops as `card_1.png` ... `card_N.png` in reading order
//!
//! ## Example
//!
//! ```rust,no_run
//! use binder_scan::{split_binder_page, ContourParams};
//! use std::path::Path;
//!
//! let cards = split_binder_page(
//!     Path::new("binder_page.jpg"),
//!     Path::new("uploads/page_1"),
//!     &ContourParams::default(),
//! );
//! for path in &cards {
//!     println!("{}", path.display());
//! }
//! ```
//!
//! The `split_*` entry points never fail: an unreadable photo and a page
//! with no detectable cards both yield an empty list. Use
//! [`CardSplitter::try_split`] to tell the two apart.

use std::path::{Path, PathBuf};

use tracing::error;

pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod image_loader;
pub mod output;

pub use config::{ContourParams, GridParams, SplitMethod, SplitterConfig};
pub use detection::{CardCandidate, CardRegion, CardSplitter, ContourSplitter, GridSplitter};
pub use error::{Result, SplitError};

/// Split a binder page by contour detection
///
/// This is the main entry point for contour-based extraction. Invalid
/// parameters, unreadable images and write failures are logged and
/// reported as an empty list.
///
/// # Arguments
///
/// * `image_path` - Path to the page photo
/// * `output_dir` - Directory for `card_<n>.png` files, created if absent
/// * `params` - Contour detection parameters
///
/// # Returns
///
/// Paths of the written card images in reading order (at most 9)
pub fn split_binder_page(
    image_path: &Path,
    output_dir: &Path,
    params: &ContourParams,
) -> Vec<PathBuf> {
    match ContourSplitter::with_params(params.clone()) {
        Ok(splitter) => splitter.split(image_path, output_dir),
        Err(e) => {
            error!("Rejected contour parameters: {}", e);
            Vec::new()
        }
    }
}

/// Split a binder page along a fixed 3x3 grid
///
/// # Arguments
///
/// * `image_path` - Path to the page photo
/// * `output_dir` - Directory for `card_<n>.png` files, created if absent
/// * `inner_crop_percent` - Share of each cell trimmed from every side (0-100)
///
/// # Returns
///
/// Paths of the written card images in row-major order, blanks omitted
pub fn split_binder_page_by_grid(
    image_path: &Path,
    output_dir: &Path,
    inner_crop_percent: u8,
) -> Vec<PathBuf> {
    match GridSplitter::with_params(GridParams::with_inner_crop(inner_crop_percent)) {
        Ok(splitter) => splitter.split(image_path, output_dir),
        Err(e) => {
            error!("Rejected grid parameters: {}", e);
            Vec::new()
        }
    }
}
