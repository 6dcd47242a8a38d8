//! Display list construction.
//!
//! Flattens the laid-out region into paint commands in painting order:
//! page background, accent bars, then per-block background and glyph
//! runs. The rasterizer executes the list without touching the DOM.

use crate::rendering::layout::{BlockKind, RegionLayout, GLYPH_CELL};
use crate::resources::ImageSet;
use crate::style::{NormalizedDom, Rgba};

/// Placeholder fill for images that failed to fetch or decode
const PLACEHOLDER: Rgba = Rgba::opaque(229, 231, 235);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: (u8, u8, u8, u8),
    },
    Glyphs {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
        rgba: (u8, u8, u8, u8),
    },
    /// Blit the decoded image of the given normalized node
    Blit {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        node: usize,
    },
}

fn rgba(c: Rgba) -> (u8, u8, u8, u8) {
    (c.r, c.g, c.b, c.a)
}

/// Build the flat display list for a laid-out region.
pub fn build_display_list(
    layout: &RegionLayout,
    dom: &NormalizedDom,
    images: &ImageSet,
) -> Vec<PaintCommand> {
    let mut list = Vec::with_capacity(layout.nodes.len() * 2 + 2);

    // The output medium has no transparency: the page itself is opaque
    // white, and everything unresolved falls through to it.
    list.push(PaintCommand::SolidRect {
        x: 0,
        y: 0,
        width: layout.width,
        height: layout.height,
        rgba: rgba(Rgba::WHITE),
    });

    for bar in &layout.accents {
        list.push(PaintCommand::SolidRect {
            x: bar.rect.x,
            y: bar.rect.y,
            width: bar.rect.width,
            height: bar.rect.height,
            rgba: rgba(dom.nodes[bar.node].border),
        });
    }

    for node in &layout.nodes {
        let element = &dom.nodes[node.node];
        let rect = &node.lb.rect;

        if node.kind == BlockKind::Image {
            if images.get(node.node).is_some() {
                list.push(PaintCommand::Blit {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    node: node.node,
                });
            } else {
                list.push(PaintCommand::SolidRect {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    rgba: rgba(PLACEHOLDER),
                });
            }
            continue;
        }

        if let Some(background) = element.background {
            list.push(PaintCommand::SolidRect {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                rgba: rgba(background),
            });
        }

        let padding = node.lb.box_model.padding as i32;
        let line_height = (GLYPH_CELL * node.scale) as i32;
        let pad_y = ((rect.height as i32 - node.lines.len() as i32 * line_height) / 2).max(0);
        for (i, line) in node.lines.iter().enumerate() {
            list.push(PaintCommand::Glyphs {
                x: rect.x + padding,
                y: rect.y + pad_y + i as i32 * line_height,
                text: line.clone(),
                scale: node.scale,
                rgba: rgba(element.color),
            });
        }
    }

    list
}
