//! Card detection module
//!
//! This module handles locating individual cards on a binder page, either by
//! dividing the page into a fixed grid or by edge and contour analysis, and
//! discarding empty pockets.

pub mod blank;
pub mod contour;
pub mod edges;
pub mod geometry;
pub mod grid;

pub use contour::{CardCandidate, ContourSplitter};
pub use geometry::CardRegion;
pub use grid::GridSplitter;

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{error, info};

use crate::image_loader::load_image;
use crate::Result;

/// A strategy that turns one binder page into per-card image files.
pub trait CardSplitter {
    /// Short method name used in logs
    fn name(&self) -> &'static str;

    /// Split an already decoded page, writing crops into `output_dir`.
    ///
    /// Returns the written card paths in reading order.
    fn split_image(&self, page: &RgbImage, output_dir: &Path) -> Result<Vec<PathBuf>>;

    /// Load and split a page, reporting failures as typed errors
    fn try_split(&self, image_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let page = load_image(image_path)?;
        self.split_image(&page, output_dir)
    }

    /// Load and split a page; any failure is logged and yields no cards
    fn split(&self, image_path: &Path, output_dir: &Path) -> Vec<PathBuf> {
        match self.try_split(image_path, output_dir) {
            Ok(paths) => {
                info!(
                    method = self.name(),
                    image = %image_path.display(),
                    "Extracted {} card images",
                    paths.len()
                );
                paths
            }
            Err(e) => {
                error!(
                    method = self.name(),
                    image = %image_path.display(),
                    "Error processing image: {}",
                    e
                );
                Vec::new()
            }
        }
    }
}
