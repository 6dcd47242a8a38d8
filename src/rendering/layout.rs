//! Block layout for the capture region.
//!
//! Blocks stack vertically with simple margins and padding. Text is
//! measured in fixed 8 px glyph cells multiplied by a per-block scale, so
//! wrapping is a plain character-count computation. Spans with a resolved
//! background flow inline as chips; container divs whose border color
//! differs from their text color get a left accent bar and indent their
//! children.

use crate::style::NormalizedDom;
use crate::Viewport;

/// Width and height of one glyph cell at scale 1, in CSS pixels.
pub const GLYPH_CELL: u32 = 8;

const PAGE_PADDING: u32 = 32;
const ACCENT_INDENT: u32 = 32;
const ACCENT_WIDTH: u32 = 3;
const CHIP_PAD_X: u32 = 12;
const CHIP_PAD_Y: u32 = 6;
const CHIP_GAP: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxModel {
    pub margin: u32,
    pub border: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub rect: Rect,
    pub box_model: BoxModel,
}

impl LayoutBox {
    pub fn content_width(&self) -> u32 {
        let total = self.box_model.margin + self.box_model.border + self.box_model.padding;
        self.rect.width.saturating_sub(total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    Label,
    Chip,
    Image,
}

/// A layout node couples a [`LayoutBox`] with wrapped text lines, a glyph
/// scale, and the index of the normalized element it came from.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub lb: LayoutBox,
    pub kind: BlockKind,
    pub lines: Vec<String>,
    pub scale: u32,
    pub node: usize,
}

/// Left accent bar emitted for a bordered container.
#[derive(Debug, Clone)]
pub struct AccentBar {
    pub rect: Rect,
    pub node: usize,
}

/// The laid-out region: block list, accent bars, and the content extent.
#[derive(Debug, Clone)]
pub struct RegionLayout {
    pub nodes: Vec<LayoutNode>,
    pub accents: Vec<AccentBar>,
    pub width: u32,
    pub height: u32,
}

fn heading_scale(tag: &str) -> Option<u32> {
    match tag {
        "h1" => Some(4),
        "h2" => Some(3),
        "h3" => Some(2),
        _ => None,
    }
}

fn is_accent_container(dom: &NormalizedDom, idx: usize) -> bool {
    let node = &dom.nodes[idx];
    node.tag == "div" && node.border != node.color
}

fn indent_of(dom: &NormalizedDom, idx: usize) -> u32 {
    let mut depth = 0u32;
    let mut cur = dom.nodes[idx].parent;
    while let Some(p) = cur {
        if is_accent_container(dom, p) {
            depth += 1;
        }
        cur = dom.nodes[p].parent;
    }
    depth * ACCENT_INDENT
}

/// Wrap text into lines that fit `chars_per_line` characters.
fn wrap(text: &str, chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if cur.chars().count() + word.chars().count() + 1 > chars_per_line && !cur.is_empty() {
            lines.push(cur);
            cur = word.to_string();
        } else {
            if !cur.is_empty() {
                cur.push(' ');
            }
            cur.push_str(word);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

fn attr_u32(dom: &NormalizedDom, idx: usize, name: &str) -> Option<u32> {
    dom.nodes[idx]
        .attrs
        .iter()
        .find(|(k, _)| k == name)
        .and_then(|(_, v)| v.trim().parse().ok())
}

/// Compute a block layout for the normalized region at the given viewport.
pub fn layout_region(dom: &NormalizedDom, viewport: Viewport) -> RegionLayout {
    let width = viewport.width.max(2 * PAGE_PADDING + GLYPH_CELL);
    let right_edge = (width - PAGE_PADDING) as i32;
    let mut y = PAGE_PADDING as i32;
    let mut nodes: Vec<LayoutNode> = Vec::new();

    // Inline chip flow state
    let mut chip_x: i32 = 0;
    let mut chip_row_h: u32 = 0;
    let mut in_chip_row = false;

    for (idx, node) in dom.nodes.iter().enumerate() {
        let is_chip = node.tag == "span" && node.background.is_some();

        if in_chip_row && !is_chip {
            y += chip_row_h as i32 + 12;
            in_chip_row = false;
        }

        if node.tag == "img" {
            let indent = indent_of(dom, idx);
            let x = (PAGE_PADDING + indent) as i32;
            let max_w = width.saturating_sub(2 * PAGE_PADDING + indent).max(GLYPH_CELL);
            let w = attr_u32(dom, idx, "width").unwrap_or(128).min(max_w);
            let h = attr_u32(dom, idx, "height").unwrap_or(128);
            nodes.push(LayoutNode {
                lb: LayoutBox {
                    rect: Rect { x, y, width: w, height: h },
                    box_model: BoxModel { margin: 8, border: 0, padding: 0 },
                },
                kind: BlockKind::Image,
                lines: Vec::new(),
                scale: 1,
                node: idx,
            });
            y += h as i32 + 8;
            continue;
        }

        if node.text.is_empty() {
            continue;
        }

        if is_chip {
            let scale = 1u32;
            let text_w = node.text.chars().count() as u32 * GLYPH_CELL * scale;
            let w = text_w + 2 * CHIP_PAD_X;
            let h = GLYPH_CELL * scale + 2 * CHIP_PAD_Y;
            let left = (PAGE_PADDING + indent_of(dom, idx)) as i32;

            if !in_chip_row {
                chip_x = left;
                chip_row_h = h;
                in_chip_row = true;
            } else if chip_x + w as i32 > right_edge {
                y += chip_row_h as i32 + CHIP_GAP as i32;
                chip_x = left;
            }

            nodes.push(LayoutNode {
                lb: LayoutBox {
                    rect: Rect { x: chip_x, y, width: w, height: h },
                    box_model: BoxModel { margin: 0, border: 0, padding: CHIP_PAD_X },
                },
                kind: BlockKind::Chip,
                lines: vec![node.text.clone()],
                scale,
                node: idx,
            });
            chip_x += w as i32 + CHIP_GAP as i32;
            continue;
        }

        let (kind, scale, padding, margin) = match heading_scale(&node.tag) {
            Some(scale) => (BlockKind::Heading, scale, 4u32, 12u32),
            None if node.tag == "p" => (BlockKind::Paragraph, 1, 4, 10),
            None => (BlockKind::Label, 1, 2, 4),
        };

        let indent = indent_of(dom, idx);
        let x = (PAGE_PADDING + indent) as i32;
        let block_w = width.saturating_sub(2 * PAGE_PADDING + indent);
        let content_w = block_w.saturating_sub(2 * padding);
        let cell = GLYPH_CELL * scale;
        let chars_per_line = ((content_w / cell).max(1)) as usize;
        let lines = wrap(&node.text, chars_per_line);
        let line_count = lines.len().max(1) as u32;
        let h = line_count * cell + 2 * padding;

        nodes.push(LayoutNode {
            lb: LayoutBox {
                rect: Rect { x, y, width: block_w, height: h },
                box_model: BoxModel { margin, border: 0, padding },
            },
            kind,
            lines,
            scale,
            node: idx,
        });
        y += h as i32 + margin as i32;
    }

    if in_chip_row {
        y += chip_row_h as i32 + 12;
    }

    // Accent bars span the laid-out extent of their container's blocks.
    let mut accents = Vec::new();
    for idx in 0..dom.nodes.len() {
        if !is_accent_container(dom, idx) {
            continue;
        }
        let mut top: Option<i32> = None;
        let mut bottom: Option<i32> = None;
        for ln in &nodes {
            if dom.is_descendant_of(ln.node, idx) {
                let b = ln.lb.rect.y + ln.lb.rect.height as i32;
                top = Some(top.map_or(ln.lb.rect.y, |t: i32| t.min(ln.lb.rect.y)));
                bottom = Some(bottom.map_or(b, |x: i32| x.max(b)));
            }
        }
        if let (Some(top), Some(bottom)) = (top, bottom) {
            accents.push(AccentBar {
                rect: Rect {
                    x: (PAGE_PADDING + indent_of(dom, idx)) as i32,
                    y: top,
                    width: ACCENT_WIDTH,
                    height: (bottom - top).max(0) as u32,
                },
                node: idx,
            });
        }
    }

    let height = (y + PAGE_PADDING as i32).max(viewport.height as i32) as u32;
    RegionLayout {
        nodes,
        accents,
        width,
        height,
    }
}
