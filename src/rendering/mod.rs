//! Capture stages: layout -> paint -> raster.

pub mod layout;
pub mod paint;
pub mod raster;

/// An in-memory raster snapshot of the capture region.
///
/// Dimensions are the raster's pixel dimensions after upscaling; the PNG
/// bytes are what gets embedded into the output document.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Snapshot {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            png_data: Vec::new(),
        }
    }
}
