//! Error types for the export pipeline

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing a region or assembling the PDF
#[derive(Error, Debug)]
pub enum Error {
    /// The region selector matched nothing in the document
    #[error("Capture region not found: {0}")]
    RegionNotFound(String),

    /// The region selector could not be parsed
    #[error("Invalid region selector: {0}")]
    Selector(String),

    /// A linked stylesheet could not be fetched or read
    #[error("Stylesheet fetch failed: {0}")]
    Stylesheet(String),

    /// An image resource could not be fetched or decoded
    #[error("Resource fetch failed: {0}")]
    Resource(String),

    /// Rasterization of the display list failed
    #[error("Rasterization failed: {0}")]
    Raster(String),

    /// PNG encoding of the raster failed
    #[error("Image encoding failed: {0}")]
    Encode(String),

    /// PDF assembly failed
    #[error("PDF assembly failed: {0}")]
    Assembly(String),

    /// Writing the output file failed
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
