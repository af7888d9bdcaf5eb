//! Error types for the binder_scan library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for binder_scan operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Error types for binder page splitting operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Image file could not be opened or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File extension is not a known raster format
    #[error("Unsupported image format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Output directory could not be created
    #[error("Failed to create output directory {}", path.display())]
    OutputDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A card crop or debug overlay could not be written
    #[error("Failed to save image {}", path.display())]
    SaveError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic processing error
    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

impl SplitError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a condition worth retrying
    ///
    /// Filesystem failures may be transient; a bad image or a bad
    /// configuration will fail the same way every time.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SplitError::OutputDirError { .. } | SplitError::SaveError { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            SplitError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file and try again.".to_string()
            }
            SplitError::UnsupportedFormat { path } => format!(
                "The file '{}' is not a supported image type. Please upload a PNG, JPEG or WebP photo.",
                path.display()
            ),
            SplitError::OutputDirError { .. } | SplitError::SaveError { .. } => {
                "Could not store the extracted card images. Please try again.".to_string()
            }
            SplitError::InvalidParameter { parameter, value } => {
                format!("Setting '{}' has an invalid value ({}).", parameter, value)
            }
            _ => "Card extraction failed. Please try with a different photo.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_recoverable() {
        let err = SplitError::OutputDirError {
            path: PathBuf::from("/readonly/out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_recoverable());

        let err = SplitError::invalid_parameter("min_area_ratio", 0.5);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = SplitError::invalid_parameter("canny_low", 200);
        assert_eq!(err.to_string(), "Invalid parameter: canny_low = 200");
        assert!(err.user_message().contains("canny_low"));
    }

    #[test]
    fn test_image_load_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SplitError::image_load("Failed to open page.jpg", io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("page.jpg"));
    }
}
