//! Card rectangles and reading order for detected cards

use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle inside a page image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CardRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding rectangle of a point set, inclusive of the extreme pixels.
    ///
    /// Negative coordinates are clamped to zero. Returns `None` for an empty set.
    pub fn bounding(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        let max_x = max_x.max(min_x);
        let max_y = max_y.max(min_y);
        Some(Self::new(
            min_x as u32,
            min_y as u32,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        ))
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width divided by height; 0 for a zero-height region
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grow by `padding` on every side, clamped to a `bound_width` x `bound_height` image
    pub fn padded(&self, padding: u32, bound_width: u32, bound_height: u32) -> Self {
        let x0 = self.x.saturating_sub(padding).min(bound_width);
        let y0 = self.y.saturating_sub(padding).min(bound_height);
        let x1 = self
            .x
            .saturating_add(self.width)
            .saturating_add(padding)
            .min(bound_width);
        let y1 = self
            .y
            .saturating_add(self.height)
            .saturating_add(padding)
            .min(bound_height);
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Row band index used for reading order
pub fn row_index(region: &CardRegion, image_height: u32, row_tolerance_ratio: f64) -> i64 {
    let band = image_height as f64 * row_tolerance_ratio;
    if band <= 0.0 {
        return 0;
    }
    (region.center().1 / band).round() as i64
}

/// Sort items top-to-bottom by row band, then left-to-right by centre
pub fn sort_reading_order<T, F>(
    items: &mut [T],
    image_height: u32,
    row_tolerance_ratio: f64,
    region_of: F,
) where
    F: Fn(&T) -> CardRegion,
{
    items.sort_by(|a, b| {
        let ra = region_of(a);
        let rb = region_of(b);
        row_index(&ra, image_height, row_tolerance_ratio)
            .cmp(&row_index(&rb, image_height, row_tolerance_ratio))
            .then_with(|| ra.center().0.total_cmp(&rb.center().0))
    });
}
