//! Display list execution against a tiny-skia pixmap.
//!
//! The raster is produced at the capture scale: every logical coordinate
//! in the display list is multiplied by the scale factor before drawing,
//! so a 1.5x capture of an 800x1000 region yields a 1200x1500 pixmap.
//! Glyphs come from the fixed 8x8 bitmap font; each set bit becomes a
//! scaled square. Output is always an opaque PNG.

use tiny_skia::{Paint, Pixmap, Rect, Transform};

use crate::error::{Error, Result};
use crate::rendering::paint::PaintCommand;
use crate::rendering::Snapshot;
use crate::resources::ImageSet;

fn solid_paint(rgba: (u8, u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.0, rgba.1, rgba.2, rgba.3);
    paint.anti_alias = false;
    paint
}

fn fill_px_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, rgba: (u8, u8, u8, u8)) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, &solid_paint(rgba), Transform::identity(), None);
    }
}

fn draw_glyphs(
    pixmap: &mut Pixmap,
    x: i32,
    y: i32,
    text: &str,
    glyph_scale: u32,
    rgba: (u8, u8, u8, u8),
    capture_scale: f32,
) {
    let cell = glyph_scale as f32 * capture_scale;
    let advance = 8.0 * glyph_scale as f32 * capture_scale;
    let mut pen_x = x as f32 * capture_scale;
    let pen_y = y as f32 * capture_scale;

    for ch in text.chars() {
        let code = ch as usize;
        if code >= 128 {
            pen_x += advance;
            continue;
        }
        let glyph = font8x8::legacy::BASIC_LEGACY[code];
        for (gy, row) in glyph.iter().enumerate() {
            for gx in 0..8u32 {
                if row & (1 << gx) != 0 {
                    fill_px_rect(
                        pixmap,
                        pen_x + gx as f32 * cell,
                        pen_y + gy as f32 * cell,
                        cell,
                        cell,
                        rgba,
                    );
                }
            }
        }
        pen_x += advance;
    }
}

/// Nearest-neighbor blit of a decoded image into the destination rect.
fn blit(pixmap: &mut Pixmap, src: &Pixmap, x: i32, y: i32, w: u32, h: u32, capture_scale: f32) {
    if src.width() == 0 || src.height() == 0 || w == 0 || h == 0 {
        return;
    }
    let dest_w = pixmap.width();
    let dest_h = pixmap.height();
    let dx0 = (x as f32 * capture_scale).round() as i64;
    let dy0 = (y as f32 * capture_scale).round() as i64;
    let dw = (w as f32 * capture_scale).round().max(1.0) as i64;
    let dh = (h as f32 * capture_scale).round().max(1.0) as i64;

    for dy in 0..dh {
        let py = dy0 + dy;
        if py < 0 || py >= dest_h as i64 {
            continue;
        }
        let sy = (dy * src.height() as i64 / dh).min(src.height() as i64 - 1) as u32;
        for dx in 0..dw {
            let px = dx0 + dx;
            if px < 0 || px >= dest_w as i64 {
                continue;
            }
            let sx = (dx * src.width() as i64 / dw).min(src.width() as i64 - 1) as u32;
            if let Some(pixel) = src.pixel(sx, sy) {
                let offset = py as usize * dest_w as usize + px as usize;
                pixmap.pixels_mut()[offset] = pixel;
            }
        }
    }
}

/// Execute a display list into a PNG snapshot at the given capture scale.
pub fn rasterize(
    commands: &[PaintCommand],
    width: u32,
    height: u32,
    capture_scale: f32,
    images: &ImageSet,
) -> Result<Snapshot> {
    if capture_scale <= 0.0 {
        return Err(Error::Raster(format!(
            "invalid capture scale {}",
            capture_scale
        )));
    }
    let px_width = (width as f32 * capture_scale).ceil() as u32;
    let px_height = (height as f32 * capture_scale).ceil() as u32;
    let mut pixmap = Pixmap::new(px_width, px_height).ok_or_else(|| {
        Error::Raster(format!(
            "cannot allocate {}x{} raster",
            px_width, px_height
        ))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    for command in commands {
        match command {
            PaintCommand::SolidRect {
                x,
                y,
                width,
                height,
                rgba,
            } => {
                fill_px_rect(
                    &mut pixmap,
                    *x as f32 * capture_scale,
                    *y as f32 * capture_scale,
                    *width as f32 * capture_scale,
                    *height as f32 * capture_scale,
                    *rgba,
                );
            }
            PaintCommand::Glyphs {
                x,
                y,
                text,
                scale,
                rgba,
            } => {
                draw_glyphs(&mut pixmap, *x, *y, text, *scale, *rgba, capture_scale);
            }
            PaintCommand::Blit {
                x,
                y,
                width,
                height,
                node,
            } => {
                if let Some(src) = images.get(*node) {
                    blit(&mut pixmap, src, *x, *y, *width, *height, capture_scale);
                }
            }
        }
    }

    let png_data = pixmap
        .encode_png()
        .map_err(|e| Error::Encode(format!("PNG encode failed: {}", e)))?;
    Ok(Snapshot {
        width: px_width,
        height: px_height,
        png_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: (u8, u8, u8, u8) = (255, 255, 255, 255);

    fn decode(snapshot: &Snapshot) -> Pixmap {
        Pixmap::decode_png(&snapshot.png_data).expect("valid PNG")
    }

    #[test]
    fn dimensions_follow_capture_scale() {
        let snap = rasterize(&[], 800, 1000, 1.5, &ImageSet::default()).unwrap();
        assert_eq!(snap.width, 1200);
        assert_eq!(snap.height, 1500);
        let pixmap = decode(&snap);
        assert_eq!(pixmap.width(), 1200);
        assert_eq!(pixmap.height(), 1500);
    }

    #[test]
    fn empty_list_is_all_white() {
        let snap = rasterize(&[], 8, 8, 1.0, &ImageSet::default()).unwrap();
        let pixmap = decode(&snap);
        for pixel in pixmap.pixels() {
            assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (255, 255, 255));
        }
    }

    #[test]
    fn solid_rect_lands_scaled() {
        let commands = vec![PaintCommand::SolidRect {
            x: 2,
            y: 2,
            width: 2,
            height: 2,
            rgba: (255, 0, 0, 255),
        }];
        let snap = rasterize(&commands, 8, 8, 2.0, &ImageSet::default()).unwrap();
        let pixmap = decode(&snap);
        let at = |x, y| {
            let p = pixmap.pixel(x, y).unwrap();
            (p.red(), p.green(), p.blue(), p.alpha())
        };
        assert_eq!(at(4, 4), (255, 0, 0, 255));
        assert_eq!(at(7, 7), (255, 0, 0, 255));
        assert_eq!(at(3, 3), WHITE);
        assert_eq!(at(8, 8), WHITE);
    }

    #[test]
    fn glyphs_ink_the_raster() {
        let commands = vec![PaintCommand::Glyphs {
            x: 0,
            y: 0,
            text: "A".to_string(),
            scale: 1,
            rgba: (0, 0, 0, 255),
        }];
        let snap = rasterize(&commands, 8, 8, 1.0, &ImageSet::default()).unwrap();
        let pixmap = decode(&snap);
        let inked = pixmap
            .pixels()
            .iter()
            .filter(|p| (p.red(), p.green(), p.blue()) == (0, 0, 0))
            .count();
        assert!(inked > 0, "expected at least one black pixel");
    }

    #[test]
    fn rasterization_is_deterministic() {
        let commands = vec![
            PaintCommand::SolidRect {
                x: 0,
                y: 0,
                width: 20,
                height: 20,
                rgba: (59, 130, 246, 255),
            },
            PaintCommand::Glyphs {
                x: 2,
                y: 2,
                text: "hi".to_string(),
                scale: 1,
                rgba: (17, 24, 39, 255),
            },
        ];
        let a = rasterize(&commands, 40, 40, 1.5, &ImageSet::default()).unwrap();
        let b = rasterize(&commands, 40, 40, 1.5, &ImageSet::default()).unwrap();
        assert_eq!(a.png_data, b.png_data);
    }

    #[test]
    fn zero_scale_is_rejected() {
        assert!(rasterize(&[], 8, 8, 0.0, &ImageSet::default()).is_err());
    }
}
