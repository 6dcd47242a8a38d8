use cvpress::PageGeometry;

#[test]
fn width_is_always_the_printable_width() {
    for (w, h) in [(100u32, 100u32), (800, 2000), (1344, 4000), (50, 5000)] {
        let g = PageGeometry::fit(w, h);
        assert_eq!(g.image_width_mm, 200.0, "for {}x{}", w, h);
        assert_eq!(g.offset_x_mm, 5.0);
        assert_eq!(g.offset_y_mm, 5.0);
    }
}

#[test]
fn short_raster_preserves_aspect_ratio() {
    let g = PageGeometry::fit(800, 800);
    assert_eq!(g.image_height_mm, 200.0);
    assert!(!g.clamped);
}

#[test]
fn tall_raster_is_compressed_onto_one_page() {
    // Aspect-true height would be 2000 * 200 / 800 = 500 mm
    let g = PageGeometry::fit(800, 2000);
    assert_eq!(g.image_height_mm, 287.0);
    assert!(g.clamped);
}

#[test]
fn image_never_exceeds_the_bottom_margin() {
    for h in [1, 500, 1148, 1149, 10000] {
        let g = PageGeometry::fit(800, h);
        assert!(
            g.offset_y_mm + g.image_height_mm <= 297.0 - 5.0 + 1e-3,
            "height {} ran past the margin: {:?}",
            h,
            g
        );
    }
}

#[test]
fn fit_is_a_pure_function_of_dimensions() {
    let a = PageGeometry::fit(1344, 2100);
    let b = PageGeometry::fit(1344, 2100);
    assert_eq!(a, b);
}
