//! Image error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or decoding image payloads
#[derive(Error, Debug)]
pub enum ImageError {
    /// Failed to read an image from disk
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Base64 payload could not be decoded
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Bytes are not a supported raster format
    #[error("Unrecognized image data: {0}")]
    Decode(#[from] image::ImageError),

    /// Bytes look like markup but are not a valid SVG document
    #[error("Invalid SVG document: {0}")]
    Svg(#[from] usvg::Error),

    /// The payload contained no bytes at all
    #[error("Image data is empty")]
    Empty,
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
