//! Error types for the photo-watermark crate.

use std::path::PathBuf;

/// Errors that can occur while loading, watermarking and writing images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The watermark asset could not be read or decoded. Fatal for a batch.
    #[error("failed to load watermark {}: {source}", path.display())]
    WatermarkLoad {
        /// Path of the watermark asset.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// The watermark asset decoded without an alpha channel.
    #[error("watermark {} has no alpha channel", .0.display())]
    WatermarkMissingAlpha(PathBuf),

    /// The target canvas has a zero dimension.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },

    /// A source image could not be decoded.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// Path of the source image.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// Base and overlay rasters passed to the compositor differ in size.
    #[error(
        "dimension mismatch: base is {base_width}x{base_height}, \
         overlay is {overlay_width}x{overlay_height}"
    )]
    DimensionMismatch {
        /// Base raster width.
        base_width: u32,
        /// Base raster height.
        base_height: u32,
        /// Overlay raster width.
        overlay_width: u32,
        /// Overlay raster height.
        overlay_height: u32,
    },

    /// The resampler rejected a source or destination buffer.
    #[error("resize failed: {0}")]
    Resize(String),

    /// The watermarked image could not be encoded or written.
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Underlying encode error.
        source: image::ImageError,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let mismatch = Error::DimensionMismatch {
            base_width: 10,
            base_height: 20,
            overlay_width: 756,
            overlay_height: 756,
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("10x20"));
        assert!(msg.contains("756x756"));

        let no_alpha = Error::WatermarkMissingAlpha(PathBuf::from("wm/logo.jpg"));
        assert!(no_alpha.to_string().contains("wm/logo.jpg"));

        let canvas = Error::InvalidCanvas {
            width: 0,
            height: 756,
        };
        assert!(canvas.to_string().contains("0x756"));

        let resize = Error::Resize("unsupported channel count 5".to_string());
        assert!(resize.to_string().contains("channel count 5"));
    }
}
