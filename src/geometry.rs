//! Page geometry for the output document.
//!
//! The target is a single portrait A4 page. The raster is placed with a
//! uniform 5 mm margin: its width always becomes 200 mm, and its height
//! scales with the source aspect ratio but is clamped so it never runs
//! past the bottom margin. Tall captures therefore compress vertically
//! rather than spilling onto a second page.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const PAGE_MARGIN_MM: f32 = 5.0;

const IMAGE_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * PAGE_MARGIN_MM;
const MAX_IMAGE_HEIGHT_MM: f32 = PAGE_HEIGHT_MM - 2.0 * PAGE_MARGIN_MM;

/// Placement of the raster on the A4 page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub image_width_mm: f32,
    pub image_height_mm: f32,
    pub offset_x_mm: f32,
    pub offset_y_mm: f32,
    /// True when the aspect-preserving height exceeded the page and was
    /// clamped, distorting the vertical scale.
    pub clamped: bool,
}

impl PageGeometry {
    /// Fit a raster of the given pixel dimensions onto the page.
    pub fn fit(raster_width: u32, raster_height: u32) -> Self {
        let natural_height_mm = if raster_width == 0 {
            MAX_IMAGE_HEIGHT_MM
        } else {
            raster_height as f32 * IMAGE_WIDTH_MM / raster_width as f32
        };
        let clamped = natural_height_mm > MAX_IMAGE_HEIGHT_MM;
        PageGeometry {
            image_width_mm: IMAGE_WIDTH_MM,
            image_height_mm: if clamped {
                MAX_IMAGE_HEIGHT_MM
            } else {
                natural_height_mm
            },
            offset_x_mm: PAGE_MARGIN_MM,
            offset_y_mm: PAGE_MARGIN_MM,
            clamped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_raster_keeps_aspect() {
        let g = PageGeometry::fit(800, 800);
        assert_eq!(g.image_width_mm, 200.0);
        assert_eq!(g.image_height_mm, 200.0);
        assert_eq!(g.offset_x_mm, 5.0);
        assert_eq!(g.offset_y_mm, 5.0);
        assert!(!g.clamped);
    }

    #[test]
    fn tall_raster_clamps_to_page() {
        let g = PageGeometry::fit(800, 2000);
        // Aspect-true height would be 500 mm
        assert_eq!(g.image_height_mm, 287.0);
        assert!(g.clamped);
    }

    #[test]
    fn clamp_boundary_is_exclusive() {
        // 287 mm exactly: 800 px * 287 / 200 = 1148 px tall
        let g = PageGeometry::fit(800, 1148);
        assert!((g.image_height_mm - 287.0).abs() < 1e-3);
        assert!(!g.clamped);
    }

    #[test]
    fn degenerate_width_falls_back_to_full_height() {
        let g = PageGeometry::fit(0, 100);
        assert_eq!(g.image_height_mm, 287.0);
    }
}
