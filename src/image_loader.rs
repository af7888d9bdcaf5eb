//! Loading binder page photos
//!
//! The decoder is chosen from the file contents first and the extension
//! second, so a PNG uploaded without an extension, or a JPEG saved as
//! `.jfif`, still loads. [`PageFormat`] lists the camera and scanner formats
//! batch tooling looks for when scanning a directory.
//!
//! Every page is converted to 8-bit RGB. EXIF orientation is NOT applied;
//! pages are expected upright.

use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::error::{Result, SplitError};

/// Page photo formats accepted by [`load_image`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    Jpeg,
    Png,
    WebP,
    Tiff,
    Bmp,
}

impl PageFormat {
    const ALL: [PageFormat; 5] = [
        PageFormat::Jpeg,
        PageFormat::Png,
        PageFormat::WebP,
        PageFormat::Tiff,
        PageFormat::Bmp,
    ];

    /// Lowercase extensions mapped to this format
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            PageFormat::Jpeg => &["jpg", "jpeg"],
            PageFormat::Png => &["png"],
            PageFormat::WebP => &["webp"],
            PageFormat::Tiff => &["tif", "tiff"],
            PageFormat::Bmp => &["bmp"],
        }
    }

    /// Match an extension, ignoring case
    pub fn from_extension(ext: &str) -> Option<PageFormat> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Format implied by a path's extension
    pub fn from_path(path: &Path) -> Option<PageFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Load a page photo as an RGB8 buffer
///
/// # Errors
///
/// `SplitError::UnsupportedFormat` when neither the file contents nor the
/// extension name an image format, `SplitError::ImageLoadError` when the
/// file cannot be opened or decoded.
///
/// # Example
///
/// ```rust,no_run
/// use binder_scan::image_loader::load_image;
/// use std::path::Path;
///
/// let page = load_image(Path::new("binder_page.jpg"))?;
/// println!("Loaded page: {}x{}", page.width(), page.height());
/// # Ok::<(), binder_scan::SplitError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| SplitError::image_load(format!("Cannot open {}", path.display()), e))?;

    if reader.format().is_none() {
        return Err(SplitError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let page = reader
        .decode()
        .map_err(|e| SplitError::image_load(format!("Cannot decode {}", path.display()), e))?;

    Ok(page.to_rgb8())
}

/// Whether `ext` (without the dot) names a page format
pub fn is_supported_extension(ext: &str) -> bool {
    PageFormat::from_extension(ext).is_some()
}
