//! End-to-end export pipeline.
//!
//! One [`Exporter::export_to_dir`] call runs the full chain: locate the
//! capture region, resolve styles, fetch images, lay out, rasterize, fit
//! to the page, assemble the document, and deliver it atomically. Every
//! stage failure surfaces as a typed [`Error`]; nothing is written on
//! failure, not even a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::dom::{DomSnapshot, Region};
use crate::error::{Error, Result};
use crate::geometry::PageGeometry;
use crate::rendering::{layout, paint, raster, Snapshot};
use crate::resources::fetch_images;
use crate::style::{collect_stylesheets, normalize};
use crate::CaptureConfig;

/// Fixed name of the delivered document.
pub const OUTPUT_FILE_NAME: &str = "alexander_thompson_resume.pdf";

/// A fully assembled document plus the capture facts that produced it.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub pdf: Vec<u8>,
    pub geometry: PageGeometry,
    pub snapshot_width: u32,
    pub snapshot_height: u32,
}

/// Result of writing an [`ExportArtifact`] to disk.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes: usize,
    pub geometry: PageGeometry,
}

/// Drives the capture-to-document pipeline.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: CaptureConfig,
}

impl Exporter {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Capture the region into a raster snapshot without assembling a
    /// document.
    pub fn capture(&self, region: &Region) -> Result<Snapshot> {
        let parsed = region.snapshot()?;
        self.render(region.selector(), &parsed)
    }

    /// Run the rendering stages over an already-parsed region.
    fn render(&self, selector: &str, parsed: &DomSnapshot) -> Result<Snapshot> {
        debug!("captured {} elements under {}", parsed.nodes.len(), selector);

        let sheets = collect_stylesheets(parsed, &self.config)?;
        let dom = normalize(parsed, &sheets);
        let images = fetch_images(&dom, &self.config);
        debug!(
            "normalized {} elements, {} images resolved",
            dom.nodes.len(),
            images.len()
        );

        let region_layout = layout::layout_region(&dom, self.config.viewport);
        let commands = paint::build_display_list(&region_layout, &dom, &images);
        raster::rasterize(
            &commands,
            region_layout.width,
            region_layout.height,
            self.config.scale,
            &images,
        )
    }

    /// Run the full pipeline and return the assembled document in memory.
    pub fn export(&self, region: &Region) -> Result<ExportArtifact> {
        let parsed = region.snapshot()?;
        let title = if parsed.title.is_empty() {
            "Resume".to_string()
        } else {
            parsed.title.clone()
        };

        let snapshot = self.render(region.selector(), &parsed)?;
        info!(
            "rasterized region at {}x{} px (scale {})",
            snapshot.width, snapshot.height, self.config.scale
        );

        let geometry = PageGeometry::fit(snapshot.width, snapshot.height);
        if geometry.clamped {
            info!(
                "raster taller than one page, compressed to {:.1} mm",
                geometry.image_height_mm
            );
        }

        let pdf = crate::pdf::assemble(&snapshot, &geometry, &title)?;
        Ok(ExportArtifact {
            pdf,
            geometry,
            snapshot_width: snapshot.width,
            snapshot_height: snapshot.height,
        })
    }

    /// Export and deliver the document into `dir` under
    /// [`OUTPUT_FILE_NAME`].
    ///
    /// Delivery is atomic: the bytes are written to a uniquely named
    /// temporary file in the target directory and renamed into place, so a
    /// failed export never leaves a partial document behind and
    /// overlapping exports into one directory cannot interleave their
    /// writes.
    pub fn export_to_dir(&self, region: &Region, dir: impl AsRef<Path>) -> Result<ExportReport> {
        let artifact = self.export(region)?;
        let dir = dir.as_ref();
        let path = dir.join(OUTPUT_FILE_NAME);

        let mut staging = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| Error::Delivery(format!("{}: {}", dir.display(), e)))?;
        staging
            .write_all(&artifact.pdf)
            .map_err(|e| Error::Delivery(format!("{}: {}", staging.path().display(), e)))?;
        staging
            .persist(&path)
            .map_err(|e| Error::Delivery(format!("{}: {}", path.display(), e)))?;

        info!("wrote {} ({} bytes)", path.display(), artifact.pdf.len());
        Ok(ExportReport {
            path,
            bytes: artifact.pdf.len(),
            geometry: artifact.geometry,
        })
    }
}
