//! CVPress
//!
//! Renders a static resume page and exports it as a single-page A4 PDF.
//! The pipeline captures a document region as a bitmap, normalizes color
//! styling so the rasterizer only sees directly-resolved values, computes
//! page-fit geometry, and embeds the raster into a one-page PDF.
//!
//! # Example
//!
//! ```no_run
//! use cvpress::{content::Profile, CaptureConfig, Exporter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let region = cvpress::content::resume_region(&Profile::builtin());
//! let exporter = Exporter::new(CaptureConfig::default());
//! let report = exporter.export_to_dir(&region, ".")?;
//! println!("Wrote {}", report.path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

// Static resume records and the HTML page built from them
pub mod content;

// Capture Region: parse + locate + flatten a document subtree
pub mod dom;

// Style normalization pass (cascade resolution on a throwaway clone)
pub mod style;

// Cross-origin image resources (data: URIs always; http(s) behind `remote`)
pub mod resources;

// Layout -> paint -> raster stages
pub mod rendering;

// A4 page-fit math
pub mod geometry;

// Single-page PDF assembly
pub mod pdf;

// End-to-end export pipeline
pub mod export;

// Async-friendly export API (worker-backed abstraction)
pub mod async_api;

pub use dom::Region;
pub use export::{ExportArtifact, Exporter, ExportReport, OUTPUT_FILE_NAME};
pub use geometry::PageGeometry;
pub use rendering::Snapshot;

/// Configuration for the capture pipeline
///
/// The defaults are chosen to match the on-screen rendition of the resume
/// page: a viewport wide enough for comfortable line wrapping, a 1.5x
/// raster upscale balancing sharpness against file size, and an opaque
/// white background behind any transparency.
///
/// # Examples
///
/// ```
/// let cfg = cvpress::CaptureConfig::default();
/// assert_eq!(cfg.scale, 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Viewport dimensions; width drives layout, height is a floor for
    /// very short regions
    pub viewport: Viewport,
    /// Raster upscaling factor applied at capture time
    pub scale: f32,
    /// User agent string sent with stylesheet and image fetches
    pub user_agent: String,
    /// Timeout for remote fetches in milliseconds
    pub timeout_ms: u64,
    /// Base URL for resolving relative stylesheet/image references
    pub base_url: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            scale: 1.5,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) CVPress/0.1".to_string(),
            timeout_ms: 30000,
            base_url: None,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 896,
            height: 600,
        }
    }
}

/// Build the blocking HTTP client used for stylesheet and image fetches.
#[cfg(feature = "remote")]
pub(crate) fn http_client(config: &CaptureConfig) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_millis(config.timeout_ms))
        .build()
        .map_err(|e| Error::Other(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.viewport.width, 896);
        assert_eq!(config.scale, 1.5);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_viewport() {
        let viewport = Viewport {
            width: 1024,
            height: 768,
        };
        assert_eq!(viewport.width, 1024);
        assert_eq!(viewport.height, 768);
    }
}
