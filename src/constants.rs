//! Default tuning values and fixed layout constants for binder page splitting
//!
//! The contour defaults were tuned against phone photos of standard
//! nine-pocket pages holding 2.5" x 3.5" cards.

/// Binder page layout
pub mod layout {
    /// Pocket rows on a standard binder page
    pub const GRID_ROWS: u32 = 3;

    /// Pocket columns on a standard binder page
    pub const GRID_COLS: u32 = 3;

    /// Upper bound on cards extracted from a single page
    pub const MAX_CARDS: usize = (GRID_ROWS * GRID_COLS) as usize;

    /// Nominal trading card aspect ratio (2.5 / 3.5)
    pub const CARD_ASPECT_RATIO: f64 = 2.5 / 3.5;
}

/// Grid method defaults
pub mod grid {
    /// Percentage of each cell trimmed from every side to drop pocket seams
    pub const INNER_CROP_PERCENT: u8 = 5;
}

/// Contour method defaults
pub mod contour {
    /// Gaussian blur kernel (width, height), both odd
    pub const BLUR_KERNEL: (u32, u32) = (5, 5);

    /// Canny hysteresis thresholds
    pub const CANNY_LOW_THRESHOLD: f32 = 50.0;
    pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;

    /// Card area bounds as fraction of the page; the upper bound rejects the page outline
    pub const MIN_AREA_RATIO: f64 = 0.01;
    pub const MAX_AREA_RATIO: f64 = 0.15;

    /// Accepted width/height band around the nominal card ratio
    pub const MIN_ASPECT_RATIO: f64 = 0.6;
    pub const MAX_ASPECT_RATIO: f64 = 0.85;

    /// Polygon approximation epsilon as fraction of perimeter
    pub const POLY_APPROX_EPSILON: f64 = 0.02;

    /// Row band height as fraction of image height, used for reading order
    pub const ROW_TOLERANCE_RATIO: f64 = 0.1;

    /// Edge dilation radius in pixels (0 disables)
    pub const EDGE_DILATION: u8 = 1;

    /// Padding added around each detected card before cropping
    pub const CROP_PADDING: u32 = 2;
}

/// Empty pocket detection
pub mod blank {
    /// Grayscale variance below which a region is an empty pocket
    pub const VARIANCE_THRESHOLD: f64 = 100.0;
}

/// Output naming
pub mod output {
    /// Prefix of extracted card files: `card_<n>.png`
    pub const CARD_FILE_PREFIX: &str = "card_";

    /// Extension used for every written image
    pub const IMAGE_EXTENSION: &str = "png";

    /// Debug overlay with accepted contours drawn
    pub const DEBUG_IMAGE_NAME: &str = "_debug_contours.png";

    /// Overlay line colour (RGB)
    pub const DEBUG_LINE_COLOR: [u8; 3] = [0, 255, 0];
}
