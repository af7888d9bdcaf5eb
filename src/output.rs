//! Writing extracted cards and the debug overlay to disk

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::debug;

use crate::constants::output::{CARD_FILE_PREFIX, DEBUG_IMAGE_NAME, IMAGE_EXTENSION};
use crate::{Result, SplitError};

/// Writes `card_1.png`, `card_2.png`, ... into one output directory.
///
/// Numbering counts written cards only, so skipped cells leave no gaps.
/// Existing files with the same names are overwritten.
#[derive(Debug)]
pub struct CardWriter {
    output_dir: PathBuf,
    written: usize,
}

impl CardWriter {
    /// Create the output directory if absent and start numbering at 1
    pub fn create(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir).map_err(|source| SplitError::OutputDirError {
            path: output_dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            written: 0,
        })
    }

    /// Path the next card will be written to
    pub fn next_path(&self) -> PathBuf {
        card_path(&self.output_dir, self.written + 1)
    }

    /// Save a card crop under the next sequential name
    pub fn write_card(&mut self, card: &RgbImage) -> Result<PathBuf> {
        let path = self.next_path();
        save_png(card, &path)?;
        self.written += 1;
        debug!(path = %path.display(), "saved card {}", self.written);
        Ok(path)
    }

    /// Save the debug overlay next to the cards
    pub fn write_debug(&self, overlay: &RgbImage) -> Result<PathBuf> {
        let path = self.output_dir.join(DEBUG_IMAGE_NAME);
        save_png(overlay, &path)?;
        debug!(path = %path.display(), "saved debug overlay");
        Ok(path)
    }

    /// Number of cards written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

/// `<dir>/card_<index>.png`
pub fn card_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("{}{}.{}", CARD_FILE_PREFIX, index, IMAGE_EXTENSION))
}

fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| SplitError::SaveError {
            path: path.to_path_buf(),
            source,
        })
}
