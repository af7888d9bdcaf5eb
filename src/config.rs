//! Configuration structures for the binder_scan splitting pipeline.
//!
//! This module defines all tunable parameters for both splitting methods.
//! Every bundle is validated once, when a splitter is built from it.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use binder_scan::SplitterConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = SplitterConfig::from_json_file(Path::new("splitter.json"))?;
//!
//! // Or use defaults
//! let config = SplitterConfig::default();
//! let splitter = config.build()?;
//! # Ok::<(), binder_scan::SplitError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`GridParams`]: fixed 3x3 division with inner crop
//! - [`ContourParams`]: edge detection, contour filters and ordering

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::constants::{blank, contour, grid, layout};
use crate::detection::{CardSplitter, ContourSplitter, GridSplitter};
use crate::{Result, SplitError};

/// Splitting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Detect card outlines with edge and contour analysis
    #[default]
    Contour,
    /// Divide the page into an exact 3x3 grid
    Grid,
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMethod::Contour => f.write_str("contour"),
            SplitMethod::Grid => f.write_str("grid"),
        }
    }
}

impl FromStr for SplitMethod {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "contour" => Ok(SplitMethod::Contour),
            "grid" => Ok(SplitMethod::Grid),
            other => Err(SplitError::invalid_parameter("method", other)),
        }
    }
}

/// Complete splitter configuration.
///
/// Holds the method selection and both parameter bundles so one JSON file
/// can drive either method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Which splitter [`SplitterConfig::build`] returns
    #[serde(default)]
    pub method: SplitMethod,

    /// Grid method parameters
    #[serde(default)]
    pub grid: GridParams,

    /// Contour method parameters
    #[serde(default)]
    pub contour: ContourParams,
}

/// Grid method parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Percentage of each cell trimmed from every side (0-100).
    /// Values of 50 or more collapse every cell.
    pub inner_crop_percent: u8,

    /// Grayscale variance below which a cell is an empty pocket
    #[serde(default = "default_blank_variance")]
    pub blank_variance_threshold: f64,
}

/// Contour detection parameters.
///
/// Controls the edge detection and contour analysis used to locate
/// individual cards on the page, and which candidates count as cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourParams {
    /// Gaussian blur kernel size (width, height), both odd
    pub blur_kernel: (u32, u32),

    /// Canny edge detection low threshold
    pub canny_low_threshold: f32,

    /// Canny edge detection high threshold
    pub canny_high_threshold: f32,

    /// Minimum card area as fraction of image (exclusive)
    pub min_area_ratio: f64,

    /// Maximum card area as fraction of image (exclusive)
    pub max_area_ratio: f64,

    /// Minimum width/height ratio (exclusive)
    pub min_aspect_ratio: f64,

    /// Maximum width/height ratio (exclusive)
    pub max_aspect_ratio: f64,

    /// Polygon approximation epsilon as fraction of perimeter
    pub poly_approx_epsilon: f64,

    /// Row band height as fraction of image height
    pub row_tolerance_ratio: f64,

    /// Edge dilation radius before contour tracing (0 disables)
    #[serde(default = "default_edge_dilation")]
    pub edge_dilation: u8,

    /// Padding around each card crop in pixels
    #[serde(default = "default_crop_padding")]
    pub crop_padding: u32,

    /// Grayscale variance below which a crop is an empty pocket
    #[serde(default = "default_blank_variance")]
    pub blank_variance_threshold: f64,

    /// Maximum number of cards kept after ordering (at most 9)
    #[serde(default = "default_max_cards")]
    pub max_cards: usize,

    /// Write `_debug_contours.png` with accepted contours drawn
    #[serde(default)]
    pub save_debug_image: bool,
}

fn default_blank_variance() -> f64 {
    blank::VARIANCE_THRESHOLD
}

fn default_edge_dilation() -> u8 {
    contour::EDGE_DILATION
}

fn default_crop_padding() -> u32 {
    contour::CROP_PADDING
}

fn default_max_cards() -> usize {
    layout::MAX_CARDS
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            inner_crop_percent: grid::INNER_CROP_PERCENT,
            blank_variance_threshold: default_blank_variance(),
        }
    }
}

impl GridParams {
    /// Grid parameters with a custom inner crop and default blank threshold
    pub fn with_inner_crop(inner_crop_percent: u8) -> Self {
        Self {
            inner_crop_percent,
            ..Self::default()
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.inner_crop_percent > 100 {
            return Err(SplitError::invalid_parameter(
                "inner_crop_percent",
                self.inner_crop_percent,
            ));
        }
        validate_blank_threshold(self.blank_variance_threshold)
    }
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            blur_kernel: contour::BLUR_KERNEL,
            canny_low_threshold: contour::CANNY_LOW_THRESHOLD,
            canny_high_threshold: contour::CANNY_HIGH_THRESHOLD,
            min_area_ratio: contour::MIN_AREA_RATIO,
            max_area_ratio: contour::MAX_AREA_RATIO,
            min_aspect_ratio: contour::MIN_ASPECT_RATIO,
            max_aspect_ratio: contour::MAX_ASPECT_RATIO,
            poly_approx_epsilon: contour::POLY_APPROX_EPSILON,
            row_tolerance_ratio: contour::ROW_TOLERANCE_RATIO,
            edge_dilation: default_edge_dilation(),
            crop_padding: default_crop_padding(),
            blank_variance_threshold: default_blank_variance(),
            max_cards: default_max_cards(),
            save_debug_image: false,
        }
    }
}

impl ContourParams {
    /// Check parameter ranges and orderings
    pub fn validate(&self) -> Result<()> {
        let (kw, kh) = self.blur_kernel;
        if kw == 0 || kh == 0 || kw % 2 == 0 || kh % 2 == 0 {
            return Err(SplitError::invalid_parameter(
                "blur_kernel",
                format!("({}, {})", kw, kh),
            ));
        }

        if !(self.canny_low_threshold >= 0.0
            && self.canny_low_threshold < self.canny_high_threshold)
        {
            return Err(SplitError::invalid_parameter(
                "canny_low_threshold",
                format!(
                    "{} (high = {})",
                    self.canny_low_threshold, self.canny_high_threshold
                ),
            ));
        }

        let area_ok = self.min_area_ratio > 0.0
            && self.max_area_ratio < 1.0
            && self.min_area_ratio < self.max_area_ratio;
        if !area_ok {
            return Err(SplitError::invalid_parameter(
                "min_area_ratio",
                format!("{} (max = {})", self.min_area_ratio, self.max_area_ratio),
            ));
        }

        if !(self.min_aspect_ratio >= 0.0 && self.min_aspect_ratio < self.max_aspect_ratio) {
            return Err(SplitError::invalid_parameter(
                "min_aspect_ratio",
                format!("{} (max = {})", self.min_aspect_ratio, self.max_aspect_ratio),
            ));
        }

        if !(self.poly_approx_epsilon > 0.0 && self.poly_approx_epsilon < 1.0) {
            return Err(SplitError::invalid_parameter(
                "poly_approx_epsilon",
                self.poly_approx_epsilon,
            ));
        }

        if !(self.row_tolerance_ratio > 0.0) {
            return Err(SplitError::invalid_parameter(
                "row_tolerance_ratio",
                self.row_tolerance_ratio,
            ));
        }

        if self.max_cards == 0 || self.max_cards > layout::MAX_CARDS {
            return Err(SplitError::invalid_parameter("max_cards", self.max_cards));
        }

        validate_blank_threshold(self.blank_variance_threshold)
    }
}

fn validate_blank_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(SplitError::invalid_parameter(
            "blank_variance_threshold",
            threshold,
        ))
    }
}

impl SplitterConfig {
    /// Configuration selecting the grid method with the given parameters
    pub fn grid(params: GridParams) -> Self {
        Self {
            method: SplitMethod::Grid,
            grid: params,
            ..Self::default()
        }
    }

    /// Configuration selecting the contour method with the given parameters
    pub fn contour(params: ContourParams) -> Self {
        Self {
            method: SplitMethod::Contour,
            contour: params,
            ..Self::default()
        }
    }

    /// Validate the selected method's parameters and build its splitter
    pub fn build(&self) -> Result<Box<dyn CardSplitter>> {
        match self.method {
            SplitMethod::Grid => Ok(Box::new(GridSplitter::with_params(self.grid.clone())?)),
            SplitMethod::Contour => Ok(Box::new(ContourSplitter::with_params(
                self.contour.clone(),
            )?)),
        }
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SplitError::config(format!("Failed to read {}", path.display()), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SplitError::config(format!("Failed to parse {}", path.display()), e)
        })
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SplitError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            SplitError::config(format!("Failed to write {}", path.display()), e)
        })
    }
}
