//! Fixed 3x3 grid splitting
//!
//! Divides the page into nine equal cells and trims each cell inward by a
//! percentage of its size to cut away pocket seams. Works best on flat,
//! squarely framed photos where contour detection struggles with glare.

use std::path::{Path, PathBuf};

use image::{imageops, RgbImage};
use tracing::{debug, warn};

use super::blank::is_blank;
use super::geometry::CardRegion;
use super::CardSplitter;
use crate::config::GridParams;
use crate::constants::layout::{GRID_COLS, GRID_ROWS};
use crate::output::CardWriter;
use crate::Result;

/// Grid splitter over a validated [`GridParams`]
#[derive(Debug, Clone)]
pub struct GridSplitter {
    params: GridParams,
}

impl Default for GridSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl GridSplitter {
    /// Create a grid splitter with default parameters
    pub fn new() -> Self {
        Self {
            params: GridParams::default(),
        }
    }

    /// Create a grid splitter with custom parameters
    pub fn with_params(params: GridParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    /// Cropped bounds of the nine cells in row-major order.
    ///
    /// `None` marks a cell the inner crop collapsed to zero or negative size.
    pub fn cell_regions(&self, width: u32, height: u32) -> Vec<Option<CardRegion>> {
        let cell_w = width / GRID_COLS;
        let cell_h = height / GRID_ROWS;
        let pct = self.params.inner_crop_percent as f64 / 100.0;
        let crop_x = cell_w as f64 * pct;
        let crop_y = cell_h as f64 * pct;

        let mut cells = Vec::with_capacity((GRID_ROWS * GRID_COLS) as usize);
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let x0 = (col * cell_w) as f64 + crop_x;
                let x1 = ((col + 1) * cell_w) as f64 - crop_x;
                let y0 = (row * cell_h) as f64 + crop_y;
                let y1 = ((row + 1) * cell_h) as f64 - crop_y;

                if x1 <= x0 || y1 <= y0 {
                    cells.push(None);
                    continue;
                }

                let (x0, x1) = (x0 as u32, x1 as u32);
                let (y0, y1) = (y0 as u32, y1 as u32);
                let region = CardRegion::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0));
                cells.push((!region.is_empty()).then_some(region));
            }
        }
        cells
    }
}

impl CardSplitter for GridSplitter {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn split_image(&self, page: &RgbImage, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let (width, height) = page.dimensions();
        let mut writer = CardWriter::create(output_dir)?;
        let mut paths = Vec::new();

        for (index, cell) in self.cell_regions(width, height).into_iter().enumerate() {
            let cell_number = index + 1;
            let Some(region) = cell else {
                debug!(cell = cell_number, "Cell collapsed by inner crop, skipping");
                continue;
            };

            let crop =
                imageops::crop_imm(page, region.x, region.y, region.width, region.height).to_image();

            if is_blank(&crop, self.params.blank_variance_threshold) {
                debug!(cell = cell_number, "Cell looks like an empty pocket, skipping");
                continue;
            }

            match writer.write_card(&crop) {
                Ok(path) => paths.push(path),
                Err(e) => warn!(cell = cell_number, "Failed to save cell: {}", e),
            }
        }

        Ok(paths)
    }
}
