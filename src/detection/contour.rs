//! Contour-based card detection
//!
//! Implements classical edge segmentation that:
//! - Smooths the grayscale page and runs Canny edge detection
//! - Traces the outermost contours of the edge map
//! - Keeps card-sized, four-cornered, card-shaped outlines
//! - Orders the survivors in reading order and crops them
//!
//! Pages photographed at an angle still work as long as each card's
//! bounding box keeps a card-like aspect ratio.

use std::path::{Path, PathBuf};

use image::{imageops, GrayImage, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_line_segment_mut;
use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::morphology::dilate;
use imageproc::point::Point;
use tracing::debug;

use super::blank::is_blank;
use super::edges::{canny_edges, gaussian_blur};
use super::geometry::{sort_reading_order, CardRegion};
use super::CardSplitter;
use crate::config::ContourParams;
use crate::constants::output::DEBUG_LINE_COLOR;
use crate::output::CardWriter;
use crate::Result;

/// A detected card outline
#[derive(Debug, Clone, PartialEq)]
pub struct CardCandidate {
    /// Four-vertex polygon approximation of the outline
    pub polygon: Vec<Point<i32>>,
    /// Bounding box of the polygon
    pub bounds: CardRegion,
    /// Outline area divided by page area
    pub area_ratio: f64,
}

/// Contour splitter over a validated [`ContourParams`]
#[derive(Debug, Clone)]
pub struct ContourSplitter {
    params: ContourParams,
}

impl Default for ContourSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContourSplitter {
    /// Create a contour splitter with default parameters
    pub fn new() -> Self {
        Self {
            params: ContourParams::default(),
        }
    }

    /// Create a contour splitter with custom parameters
    pub fn with_params(params: ContourParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ContourParams {
        &self.params
    }

    /// Find card outlines on a page, in reading order.
    ///
    /// Returns every accepted candidate; callers keep the first
    /// `max_cards`.
    pub fn detect(&self, page: &RgbImage) -> Vec<CardCandidate> {
        let (width, height) = page.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let blurred = self.preprocess(page);
        let edges = self.detect_edges(&blurred);
        let mut candidates = self.find_candidates(&edges);

        sort_reading_order(
            &mut candidates,
            height,
            self.params.row_tolerance_ratio,
            |c| c.bounds,
        );
        candidates
    }

    /// Grayscale conversion and Gaussian smoothing
    fn preprocess(&self, page: &RgbImage) -> GrayImage {
        gaussian_blur(&imageops::grayscale(page), self.params.blur_kernel)
    }

    /// Canny edges of the smoothed page, optionally thickened to close small gaps
    fn detect_edges(&self, blurred: &GrayImage) -> GrayImage {
        let edges = canny_edges(
            blurred,
            self.params.canny_low_threshold,
            self.params.canny_high_threshold,
        );
        if self.params.edge_dilation > 0 {
            dilate(&edges, Norm::LInf, self.params.edge_dilation)
        } else {
            edges
        }
    }

    /// Outermost contours passing the area, shape and aspect filters
    fn find_candidates(&self, edges: &GrayImage) -> Vec<CardCandidate> {
        let total_area = edges.width() as f64 * edges.height() as f64;
        let contours = find_contours::<i32>(edges);

        let mut external = 0usize;
        let mut sized = 0usize;
        let mut quads = 0usize;
        let mut candidates = Vec::new();

        for contour in contours
            .iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        {
            external += 1;

            let area_ratio = contour_area(&contour.points) / total_area;
            if !self.area_in_range(area_ratio) {
                continue;
            }
            sized += 1;

            let Some(polygon) = self.approximate_quad(&contour.points) else {
                continue;
            };
            quads += 1;

            let Some(bounds) = CardRegion::bounding(&polygon) else {
                continue;
            };
            if !self.aspect_in_range(&bounds) {
                continue;
            }

            candidates.push(CardCandidate {
                polygon,
                bounds,
                area_ratio,
            });
        }

        debug!(
            contours = contours.len(),
            external,
            sized,
            quads,
            accepted = candidates.len(),
            "Contour filtering complete"
        );
        candidates
    }

    /// Douglas-Peucker outline with tolerance `poly_approx_epsilon` x perimeter,
    /// kept only when it has exactly four vertices
    pub fn approximate_quad(&self, outline: &[Point<i32>]) -> Option<Vec<Point<i32>>> {
        if outline.len() < 4 {
            return None;
        }
        let epsilon = self.params.poly_approx_epsilon * arc_length(outline, true);
        if epsilon <= 0.0 {
            return None;
        }
        let polygon = approximate_polygon_dp(outline, epsilon, true);
        (polygon.len() == 4).then_some(polygon)
    }

    /// Area ratio strictly inside the configured band
    pub fn area_in_range(&self, area_ratio: f64) -> bool {
        self.params.min_area_ratio < area_ratio && area_ratio < self.params.max_area_ratio
    }

    /// Bounding box aspect ratio strictly inside the configured band
    pub fn aspect_in_range(&self, bounds: &CardRegion) -> bool {
        let aspect = bounds.aspect_ratio();
        self.params.min_aspect_ratio < aspect && aspect < self.params.max_aspect_ratio
    }

    /// Copy of the page with every candidate outline drawn
    pub fn render_debug(&self, page: &RgbImage, candidates: &[CardCandidate]) -> RgbImage {
        let mut overlay = page.clone();
        let color = Rgb(DEBUG_LINE_COLOR);
        for candidate in candidates {
            let n = candidate.polygon.len();
            for i in 0..n {
                let a = candidate.polygon[i];
                let b = candidate.polygon[(i + 1) % n];
                // Two passes for a 2px line
                for offset in [0.0, 1.0] {
                    draw_line_segment_mut(
                        &mut overlay,
                        (a.x as f32 + offset, a.y as f32),
                        (b.x as f32 + offset, b.y as f32),
                        color,
                    );
                    draw_line_segment_mut(
                        &mut overlay,
                        (a.x as f32, a.y as f32 + offset),
                        (b.x as f32, b.y as f32 + offset),
                        color,
                    );
                }
            }
        }
        overlay
    }
}

impl CardSplitter for ContourSplitter {
    fn name(&self) -> &'static str {
        "contour"
    }

    fn split_image(&self, page: &RgbImage, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let (width, height) = page.dimensions();
        let candidates = self.detect(page);
        let mut writer = CardWriter::create(output_dir)?;

        if candidates.len() > self.params.max_cards {
            debug!(
                found = candidates.len(),
                kept = self.params.max_cards,
                "Dropping surplus candidates"
            );
        }

        let mut paths = Vec::new();
        for (index, candidate) in candidates.iter().take(self.params.max_cards).enumerate() {
            let region = candidate
                .bounds
                .padded(self.params.crop_padding, width, height);
            if region.is_empty() {
                debug!(candidate = index + 1, "Empty crop region, skipping");
                continue;
            }

            let crop =
                imageops::crop_imm(page, region.x, region.y, region.width, region.height).to_image();
            if is_blank(&crop, self.params.blank_variance_threshold) {
                debug!(candidate = index + 1, "Candidate looks like an empty pocket, skipping");
                continue;
            }

            paths.push(writer.write_card(&crop)?);
        }

        if self.params.save_debug_image {
            writer.write_debug(&self.render_debug(page, &candidates))?;
        }

        Ok(paths)
    }
}
