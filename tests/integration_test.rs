//! Integration tests for the complete page splitting pipeline
//!
//! These tests validate the end-to-end extraction workflow including:
//! - Image loading and failure handling
//! - Grid division with inner crop
//! - Contour detection, filtering and reading order
//! - Empty pocket filtering
//! - Output naming and the debug overlay
//!
//! Pages are drawn in-test so no image assets are needed.

use binder_scan::{
    split_binder_page, split_binder_page_by_grid, CardSplitter, ContourParams, ContourSplitter,
    GridParams, GridSplitter, SplitError, SplitterConfig,
};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// ============================================================================
// Synthetic pages
// ============================================================================

const CARD_COLORS: [[u8; 3]; 9] = [
    [230, 80, 80],
    [80, 200, 90],
    [90, 120, 230],
    [240, 220, 90],
    [200, 110, 220],
    [90, 210, 210],
    [220, 220, 220],
    [240, 160, 60],
    [160, 160, 240],
];

const GRID_CARD_COLORS: [[u8; 3]; 9] = [
    [200, 30, 30],
    [30, 150, 30],
    [30, 30, 200],
    [150, 120, 20],
    [120, 30, 150],
    [20, 130, 140],
    [90, 90, 90],
    [160, 80, 20],
    [40, 40, 40],
];

const BINDER_BACKGROUND: [u8; 3] = [40, 40, 40];
const PHOTO_COLOR: [u8; 3] = [30, 30, 60];

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
    for yy in y..y + h {
        for xx in x..x + w {
            img.put_pixel(xx, yy, Rgb(color));
        }
    }
}

/// Card face with a darker "photo" block in its upper part
fn draw_card(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
    fill_rect(img, x, y, w, h, color);
    let margin = (w / 8).max(4);
    fill_rect(
        img,
        x + margin,
        y + margin,
        w - 2 * margin,
        h / 2 - margin,
        PHOTO_COLOR,
    );
}

/// 600x600 page, nine 200px pockets, each holding a 140px coloured card
fn grid_page() -> RgbImage {
    let mut page = RgbImage::from_pixel(600, 600, Rgb([240, 240, 240]));
    for (i, color) in GRID_CARD_COLORS.iter().enumerate() {
        let (row, col) = (i as u32 / 3, i as u32 % 3);
        fill_rect(&mut page, col * 200 + 30, row * 200 + 30, 140, 140, *color);
    }
    page
}

/// 900x900 dark page with nine 150x200 cards (aspect 0.75, area ratio ~0.037)
fn nine_card_page() -> RgbImage {
    let mut page = RgbImage::from_pixel(900, 900, Rgb(BINDER_BACKGROUND));
    for (i, color) in CARD_COLORS.iter().enumerate() {
        let (row, col) = (i as u32 / 3, i as u32 % 3);
        draw_card(&mut page, col * 300 + 75, row * 300 + 50, 150, 200, *color);
    }
    page
}

/// 600x600 dark page with one card of the given size
fn single_card_page(w: u32, h: u32) -> RgbImage {
    single_colored_card_page(w, h, CARD_COLORS[6])
}

fn single_colored_card_page(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
    let mut page = RgbImage::from_pixel(600, 600, Rgb(BINDER_BACKGROUND));
    draw_card(&mut page, 300 - w / 2, 300 - h / 2, w, h, color);
    page
}

fn save_page(dir: &Path, name: &str, page: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    page.save(&path).unwrap();
    path
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn expected_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("card_{}.png", i)).collect()
}

fn load_rgb(path: &Path) -> RgbImage {
    image::open(path).unwrap().to_rgb8()
}

// ============================================================================
// Grid Method Tests
// ============================================================================

#[test]
fn test_grid_nine_cards_row_major() {
    let dir = tempdir().unwrap();
    let page = save_page(dir.path(), "page.png", &grid_page());
    let out = dir.path().join("cards");

    let paths = split_binder_page_by_grid(&page, &out, 5);

    assert_eq!(file_names(&paths), expected_names(9));
    for (path, expected) in paths.iter().zip(GRID_CARD_COLORS.iter()) {
        let crop = load_rgb(path);
        // 200px cell trimmed by 10px per side
        assert_eq!(crop.dimensions(), (180, 180));
        let centre = crop.get_pixel(90, 90).0;
        assert_eq!(&centre, expected, "wrong card in {}", path.display());
    }
}

#[test]
fn test_grid_skips_empty_pockets() {
    let dir = tempdir().unwrap();
    let mut page = grid_page();
    // Empty the top-right and centre pockets
    fill_rect(&mut page, 400, 0, 200, 200, [240, 240, 240]);
    fill_rect(&mut page, 200, 200, 200, 200, [240, 240, 240]);
    let page = save_page(dir.path(), "page.png", &page);

    let paths = split_binder_page_by_grid(&page, dir.path(), 5);

    assert_eq!(file_names(&paths), expected_names(7));
    let remaining = [0usize, 1, 3, 5, 6, 7, 8];
    for (path, &cell) in paths.iter().zip(remaining.iter()) {
        let crop = load_rgb(path);
        assert_eq!(&crop.get_pixel(90, 90).0, &GRID_CARD_COLORS[cell]);
    }
}

#[test]
fn test_grid_uniform_page_yields_nothing() {
    let dir = tempdir().unwrap();
    let page = RgbImage::from_pixel(600, 600, Rgb([128, 128, 128]));
    let page = save_page(dir.path(), "page.png", &page);

    assert!(split_binder_page_by_grid(&page, dir.path(), 5).is_empty());
}

#[test]
fn test_grid_half_crop_yields_nothing() {
    let dir = tempdir().unwrap();
    let page = save_page(dir.path(), "page.png", &grid_page());

    for pct in [50u8, 75, 100] {
        let out = dir.path().join(format!("crop_{}", pct));
        assert!(split_binder_page_by_grid(&page, &out, pct).is_empty());
    }
}

#[test]
fn test_grid_never_exceeds_nine() {
    let dir = tempdir().unwrap();
    // Busy noise everywhere: every cell qualifies
    let page = RgbImage::from_fn(450, 450, |x, y| {
        let v = ((x * 37 + y * 91) % 255) as u8;
        Rgb([v, 255 - v, v / 2])
    });
    let page = save_page(dir.path(), "page.png", &page);

    let paths = split_binder_page_by_grid(&page, dir.path(), 0);
    assert_eq!(paths.len(), 9);
}

// ============================================================================
// Contour Method Tests
// ============================================================================

#[test]
fn test_contour_single_card_detected() {
    let dir = tempdir().unwrap();
    // 116x155: aspect ~0.75, area ratio ~0.05
    let page = save_page(dir.path(), "page.png", &single_card_page(116, 155));

    let paths = split_binder_page(&page, dir.path(), &ContourParams::default());

    assert_eq!(file_names(&paths), expected_names(1));
    let crop = load_rgb(&paths[0]);
    let (w, h) = crop.dimensions();
    assert!((110..=130).contains(&w), "crop width {}", w);
    assert!((149..=170).contains(&h), "crop height {}", h);
    assert_eq!(crop.get_pixel(w / 2, h * 3 / 4).0, CARD_COLORS[6]);
}

#[test]
fn test_contour_tiny_card_rejected() {
    let dir = tempdir().unwrap();
    // 37x49: area ratio ~0.005, below min_area_ratio
    let page = save_page(dir.path(), "page.png", &single_card_page(37, 49));

    let paths = split_binder_page(&page, dir.path(), &ContourParams::default());
    assert!(paths.is_empty());
}

#[test]
fn test_contour_uniform_page_yields_nothing() {
    let dir = tempdir().unwrap();
    let page = RgbImage::from_pixel(600, 600, Rgb([128, 128, 128]));
    let page = save_page(dir.path(), "page.png", &page);

    assert!(split_binder_page(&page, dir.path(), &ContourParams::default()).is_empty());
}

#[test]
fn test_contour_reading_order() {
    let dir = tempdir().unwrap();
    let page = save_page(dir.path(), "page.png", &nine_card_page());

    let paths = split_binder_page(&page, dir.path(), &ContourParams::default());

    assert_eq!(file_names(&paths), expected_names(9));
    for (path, expected) in paths.iter().zip(CARD_COLORS.iter()) {
        let crop = load_rgb(path);
        let (w, h) = crop.dimensions();
        assert_eq!(
            &crop.get_pixel(w / 2, h * 3 / 4).0,
            expected,
            "wrong card in {}",
            path.display()
        );
    }
}

#[test]
fn test_contour_max_cards_keeps_first_rows() {
    let dir = tempdir().unwrap();
    let page = nine_card_page();
    let params = ContourParams {
        max_cards: 4,
        ..ContourParams::default()
    };
    let splitter = ContourSplitter::with_params(params).unwrap();

    assert_eq!(splitter.detect(&page).len(), 9);

    let paths = splitter.split_image(&page, dir.path()).unwrap();
    assert_eq!(file_names(&paths), expected_names(4));
    let fourth = load_rgb(&paths[3]);
    let (w, h) = fourth.dimensions();
    assert_eq!(fourth.get_pixel(w / 2, h * 3 / 4).0, CARD_COLORS[3]);
}

#[test]
fn test_contour_debug_overlay() {
    let dir = tempdir().unwrap();
    let page = save_page(dir.path(), "page.png", &single_card_page(116, 155));

    let quiet = dir.path().join("quiet");
    let paths = split_binder_page(&page, &quiet, &ContourParams::default());
    assert_eq!(paths.len(), 1);
    assert!(!quiet.join("_debug_contours.png").exists());

    let verbose = dir.path().join("verbose");
    let params = ContourParams {
        save_debug_image: true,
        ..ContourParams::default()
    };
    let paths = split_binder_page(&page, &verbose, &params);
    assert_eq!(file_names(&paths), expected_names(1));

    let overlay = verbose.join("_debug_contours.png");
    assert!(overlay.exists());
    assert_eq!(load_rgb(&overlay).dimensions(), (600, 600));
}

#[test]
fn test_contour_moderate_contrast_card() {
    // Luma ~112 card on a luma-40 sheet
    let page = single_colored_card_page(116, 155, CARD_COLORS[0]);

    for blur_kernel in [(5, 5), (1, 1), (5, 3), (3, 5)] {
        let dir = tempdir().unwrap();
        let params = ContourParams {
            blur_kernel,
            ..ContourParams::default()
        };
        let splitter = ContourSplitter::with_params(params).unwrap();

        let paths = splitter.split_image(&page, dir.path()).unwrap();
        assert_eq!(
            file_names(&paths),
            expected_names(1),
            "blur kernel {:?}",
            blur_kernel
        );
        let crop = load_rgb(&paths[0]);
        let (w, h) = crop.dimensions();
        assert_eq!(crop.get_pixel(w / 2, h * 3 / 4).0, CARD_COLORS[0]);
    }
}

#[test]
fn test_contour_flat_card_skipped_without_gap() {
    let dir = tempdir().unwrap();
    // Featureless grey card first in reading order, two printed cards after it
    let mut page = RgbImage::from_pixel(900, 600, Rgb(BINDER_BACKGROUND));
    fill_rect(&mut page, 100, 200, 116, 155, [110, 110, 110]);
    draw_card(&mut page, 400, 200, 116, 155, CARD_COLORS[6]);
    draw_card(&mut page, 700, 200, 116, 155, CARD_COLORS[6]);

    let params = ContourParams {
        blank_variance_threshold: 2000.0,
        ..ContourParams::default()
    };
    let splitter = ContourSplitter::with_params(params).unwrap();
    assert_eq!(splitter.detect(&page).len(), 3);

    let paths = splitter.split_image(&page, dir.path()).unwrap();

    assert_eq!(file_names(&paths), expected_names(2));
    assert!(!dir.path().join("card_3.png").exists());
    for path in &paths {
        let crop = load_rgb(path);
        let (w, h) = crop.dimensions();
        assert_eq!(crop.get_pixel(w / 2, h * 3 / 4).0, CARD_COLORS[6]);
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_missing_file_yields_nothing() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nonexistent_page.jpg");

    assert!(split_binder_page(&missing, dir.path(), &ContourParams::default()).is_empty());
    assert!(split_binder_page_by_grid(&missing, dir.path(), 5).is_empty());
}

#[test]
fn test_corrupt_file_is_reported_by_try_split() {
    let dir = tempdir().unwrap();
    let broken = dir.path().join("page.png");
    std::fs::write(&broken, b"\x89PNG but not really").unwrap();

    let splitter = GridSplitter::new();
    assert!(splitter.split(&broken, dir.path()).is_empty());

    match splitter.try_split(&broken, dir.path()) {
        Err(SplitError::ImageLoadError { .. }) => {}
        other => panic!("Expected ImageLoadError, got: {:?}", other),
    }
}

#[test]
fn test_empty_page_is_ok_not_error() {
    let dir = tempdir().unwrap();
    let page = RgbImage::from_pixel(300, 300, Rgb([200, 200, 200]));
    let page = save_page(dir.path(), "page.png", &page);

    let result = ContourSplitter::new().try_split(&page, &dir.path().join("cards"));
    assert!(matches!(result, Ok(ref paths) if paths.is_empty()));
}

// ============================================================================
// Configuration & Output Tests
// ============================================================================

#[test]
fn test_output_dir_created() {
    let dir = tempdir().unwrap();
    let page = save_page(dir.path(), "page.png", &grid_page());
    let nested = dir.path().join("uploads").join("user_7").join("page_1");

    let paths = split_binder_page_by_grid(&page, &nested, 5);

    assert!(nested.is_dir());
    assert_eq!(paths.len(), 9);
    assert!(paths.iter().all(|p| p.starts_with(&nested) && p.exists()));
}

#[test]
fn test_repeat_runs_give_same_names() {
    let dir = tempdir().unwrap();
    let page = save_page(dir.path(), "page.png", &nine_card_page());

    for method in ["grid", "contour"] {
        let config = SplitterConfig {
            method: method.parse().unwrap(),
            ..SplitterConfig::default()
        };
        let splitter = config.build().unwrap();

        let first = splitter.split(&page, &dir.path().join(format!("{}_a", method)));
        let second = splitter.split(&page, &dir.path().join(format!("{}_b", method)));

        assert!(!first.is_empty(), "{} found nothing", method);
        assert_eq!(file_names(&first), file_names(&second));
    }
}

#[test]
fn test_config_file_drives_splitter() {
    let dir = tempdir().unwrap();
    let page = save_page(dir.path(), "page.png", &grid_page());
    let config_path = dir.path().join("splitter.json");

    SplitterConfig::grid(GridParams::with_inner_crop(5))
        .to_json_file(&config_path)
        .unwrap();
    let config = SplitterConfig::from_json_file(&config_path).unwrap();
    let splitter = config.build().unwrap();

    assert_eq!(splitter.name(), "grid");
    assert_eq!(splitter.split(&page, &dir.path().join("cards")).len(), 9);
}

#[test]
fn test_bad_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("splitter.json");
    std::fs::write(&config_path, "{ method: grid").unwrap();

    let result = SplitterConfig::from_json_file(&config_path);
    assert!(matches!(result, Err(SplitError::ConfigError { .. })));
}
