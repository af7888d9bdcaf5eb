//! Empty pocket detection
//!
//! An empty binder pocket photographs as a near-uniform patch of sleeve
//! plastic or page backing, so a low grayscale variance marks the slot as
//! blank rather than holding a card.

use image::{imageops, RgbImage};

/// Population variance of the region's luma values (0 for an empty image)
pub fn grayscale_variance(region: &RgbImage) -> f64 {
    let gray = imageops::grayscale(region);
    let count = gray.as_raw().len();
    if count == 0 {
        return 0.0;
    }

    let n = count as f64;
    let (sum, sum_sq) = gray.as_raw().iter().fold((0.0f64, 0.0f64), |(s, sq), &v| {
        let v = v as f64;
        (s + v, sq + v * v)
    });
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// True when the region's variance falls strictly below `threshold`
pub fn is_blank(region: &RgbImage, threshold: f64) -> bool {
    grayscale_variance(region) < threshold
}
