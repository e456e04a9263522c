//! Error types for the thumbnail generator

use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a thumbnail
#[derive(Error, Debug)]
pub enum Error {
    /// The canvas could not be allocated
    #[error("Canvas allocation failed: {0}")]
    CanvasError(String),

    /// A paint command could not be rasterized
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// A single font candidate failed to load.
    ///
    /// Font resolution never surfaces this to callers; it is logged and the
    /// next candidate is tried.
    #[error("Font loading failed: {0}")]
    FontError(String),

    /// Image encoding failed
    #[error("Encoding failed: {0}")]
    EncodeError(#[from] image::ImageError),

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    JpegError(#[from] jpeg_encoder::EncodingError),

    /// Filesystem error while writing or inspecting output files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
