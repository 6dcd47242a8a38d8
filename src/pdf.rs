//! Single-page A4 assembly.
//!
//! Embeds the raster snapshot into a one-page portrait A4 document at the
//! placement computed by [`PageGeometry`]. The PNG is flattened to RGB
//! before embedding; the raster is opaque by construction so no alpha
//! channel survives to the document.

use std::io::BufWriter;

use printpdf::image_crate::{self, DynamicImage, ImageFormat};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::error::{Error, Result};
use crate::geometry::{PageGeometry, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::rendering::Snapshot;

const EMBED_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

/// Build the complete PDF document as a byte buffer.
pub fn assemble(snapshot: &Snapshot, geometry: &PageGeometry, title: &str) -> Result<Vec<u8>> {
    if snapshot.png_data.is_empty() {
        return Err(Error::Assembly("empty snapshot".to_string()));
    }

    let decoded = image_crate::load_from_memory_with_format(&snapshot.png_data, ImageFormat::Png)
        .map_err(|e| Error::Assembly(format!("snapshot decode failed: {}", e)))?;
    let flat = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let (px_width, px_height) = (flat.width(), flat.height());

    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    // Native placement size at the embed DPI, then scale to the target
    // millimetre box. Width and height scale independently: a clamped
    // geometry intentionally compresses the vertical axis.
    let native_width_mm = px_width as f32 * MM_PER_INCH / EMBED_DPI;
    let native_height_mm = px_height as f32 * MM_PER_INCH / EMBED_DPI;
    let transform = ImageTransform {
        translate_x: Some(Mm(geometry.offset_x_mm)),
        // PDF origin is bottom-left; the image hangs below its anchor.
        translate_y: Some(Mm(
            PAGE_HEIGHT_MM - geometry.offset_y_mm - geometry.image_height_mm
        )),
        scale_x: Some(geometry.image_width_mm / native_width_mm),
        scale_y: Some(geometry.image_height_mm / native_height_mm),
        dpi: Some(EMBED_DPI),
        ..Default::default()
    };
    Image::from_dynamic_image(&flat).add_to_layer(layer, transform);

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| Error::Assembly(format!("document serialization failed: {}", e)))?;
    writer
        .into_inner()
        .map_err(|e| Error::Assembly(format!("document flush failed: {}", e)))
}
