//! Error types for the post renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or persisting posts
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid post configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failed to rasterize a frame
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Failed to encode the rendered frame
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Failed to read or write the saved-config store
    #[error("Storage error: {0}")]
    Storage(String),

    /// Imported data could not be understood
    #[error("Import failed: {0}")]
    Import(String),

    /// A saved configuration id was not found
    #[error("No saved configuration with id '{0}'")]
    NotFound(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Encode(err.to_string())
    }
}
