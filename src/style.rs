//! Style normalization pass.
//!
//! The rasterizer only honors directly-resolved color values, so before
//! capture every element's effective text, background, and border color is
//! resolved from the cascade and written back as explicit inline
//! declarations. The pass runs on a throwaway copy of the flattened
//! element list ([`NormalizedDom`]); the live parse is never mutated.
//!
//! The rule parser is deliberately small: simple and compound selectors
//! (`tag`, `.class`, `#id`, `tag.class#id`, `*`) and the three color
//! properties. Selectors with combinators are skipped. Specificity follows
//! the usual id > class > tag weighting with later rules winning ties, and
//! resolved colors canonicalize to lowercase `#rrggbb`.

use log::{debug, warn};

use crate::dom::{DomNode, DomSnapshot};
use crate::error::Result;
use crate::CaptureConfig;

/// A resolved color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS color value: `#rgb`, `#rrggbb`, `rgb()`, `rgba()`, or a
    /// small set of named colors. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Rgba> {
        let v = value.trim().to_ascii_lowercase();

        if let Some(hex) = v.strip_prefix('#') {
            return match hex.len() {
                3 => {
                    let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                    let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                    let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                    Some(Rgba::opaque(r * 17, g * 17, b * 17))
                }
                6 => {
                    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                    Some(Rgba::opaque(r, g, b))
                }
                _ => None,
            };
        }

        if let Some(body) = v.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(|p| p.trim()).collect();
            if parts.len() == 4 {
                let r = parts[0].parse::<u8>().ok()?;
                let g = parts[1].parse::<u8>().ok()?;
                let b = parts[2].parse::<u8>().ok()?;
                let alpha = parts[3].parse::<f32>().ok()?;
                let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
                return Some(Rgba { r, g, b, a });
            }
            return None;
        }

        if let Some(body) = v.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(|p| p.trim()).collect();
            if parts.len() == 3 {
                let r = parts[0].parse::<u8>().ok()?;
                let g = parts[1].parse::<u8>().ok()?;
                let b = parts[2].parse::<u8>().ok()?;
                return Some(Rgba::opaque(r, g, b));
            }
            return None;
        }

        match v.as_str() {
            "transparent" => Some(Rgba { r: 0, g: 0, b: 0, a: 0 }),
            "black" => Some(Rgba::opaque(0, 0, 0)),
            "white" => Some(Rgba::opaque(255, 255, 255)),
            "red" => Some(Rgba::opaque(255, 0, 0)),
            "green" => Some(Rgba::opaque(0, 128, 0)),
            "blue" => Some(Rgba::opaque(0, 0, 255)),
            "gray" | "grey" => Some(Rgba::opaque(128, 128, 128)),
            "silver" => Some(Rgba::opaque(192, 192, 192)),
            "orange" => Some(Rgba::opaque(255, 165, 0)),
            "yellow" => Some(Rgba::opaque(255, 255, 0)),
            _ => None,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Canonical form written back during normalization.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The three properties the normalization pass resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorProperty {
    Color,
    Background,
    Border,
}

/// A compound selector without combinators.
#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    /// Parse `tag`, `.class`, `#id`, `tag.class#id`, or `*`.
    fn parse(selector: &str) -> Option<Compound> {
        let s = selector.trim();
        if s.is_empty() {
            return None;
        }
        if s == "*" {
            return Some(Compound::default());
        }
        // Combinators, attribute selectors, and pseudo-classes are out of
        // scope for this pass.
        if s.contains(|c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~' | '[' | ':')) {
            return None;
        }

        let mut compound = Compound::default();
        let mut rest = s;
        if !rest.starts_with('.') && !rest.starts_with('#') {
            let end = rest.find(['.', '#']).unwrap_or(rest.len());
            compound.tag = Some(rest[..end].to_ascii_lowercase());
            rest = &rest[end..];
        }
        while !rest.is_empty() {
            let kind = rest.as_bytes()[0];
            rest = &rest[1..];
            let end = rest.find(['.', '#']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() {
                return None;
            }
            match kind {
                b'.' => compound.classes.push(name.to_string()),
                b'#' => compound.id = Some(name.to_string()),
                _ => return None,
            }
            rest = &rest[end..];
        }
        Some(compound)
    }

    fn specificity(&self) -> u32 {
        let ids = u32::from(self.id.is_some());
        let classes = self.classes.len() as u32;
        let tags = u32::from(self.tag.is_some());
        ids * 100 + classes * 10 + tags
    }

    fn matches(&self, node: &DomNode) -> bool {
        if let Some(tag) = &self.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| node.classes.iter().any(|n| n == c))
    }
}

#[derive(Debug, Clone)]
struct Rule {
    selector: Compound,
    specificity: u32,
    order: usize,
    declarations: Vec<(ColorProperty, String)>,
}

/// All color rules parsed out of the document's stylesheets.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn parse(sheets: &[String]) -> RuleSet {
        let mut rules = Vec::new();
        let mut order = 0usize;

        for sheet in sheets {
            let text = strip_comments(sheet);
            for block in text.split('}') {
                let Some((selectors, body)) = block.split_once('{') else {
                    continue;
                };
                let declarations = parse_declarations(body);
                if declarations.is_empty() {
                    continue;
                }
                for part in selectors.split(',') {
                    let Some(compound) = Compound::parse(part) else {
                        debug!("skipping unsupported selector: {}", part.trim());
                        continue;
                    };
                    rules.push(Rule {
                        specificity: compound.specificity(),
                        selector: compound,
                        order,
                        declarations: declarations.clone(),
                    });
                    order += 1;
                }
            }
        }

        RuleSet { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Cascaded declaration values for one node, in application order.
    fn cascade(&self, node: &DomNode) -> Vec<(ColorProperty, String)> {
        let mut matched: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| r.selector.matches(node))
            .collect();
        matched.sort_by_key(|r| (r.specificity, r.order));
        matched
            .iter()
            .flat_map(|r| r.declarations.iter().cloned())
            .collect()
    }
}

fn strip_comments(sheet: &str) -> String {
    let mut out = String::with_capacity(sheet.len());
    let mut rest = sheet;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start..].find("*/") {
            Some(end) => rest = &rest[start + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn parse_declarations(body: &str) -> Vec<(ColorProperty, String)> {
    let mut declarations = Vec::new();
    for decl in body.split(';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match prop.trim().to_ascii_lowercase().as_str() {
            "color" => declarations.push((ColorProperty::Color, value)),
            "background-color" => declarations.push((ColorProperty::Background, value)),
            "border-color" => declarations.push((ColorProperty::Border, value)),
            _ => {}
        }
    }
    declarations
}

/// One element of the throwaway normalized copy.
#[derive(Debug, Clone)]
pub struct NormalizedNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Attributes with `style` rewritten to the resolved direct values
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub parent: Option<usize>,
    /// Resolved text color
    pub color: Rgba,
    /// Resolved background; `None` falls through to the opaque white page
    pub background: Option<Rgba>,
    /// Resolved border color (`currentColor` semantics when undeclared)
    pub border: Rgba,
}

/// The normalized clone of the capture region.
#[derive(Debug, Clone, Default)]
pub struct NormalizedDom {
    pub title: String,
    pub nodes: Vec<NormalizedNode>,
}

impl NormalizedDom {
    pub fn is_descendant_of(&self, node: usize, ancestor: usize) -> bool {
        let mut cur = self.nodes[node].parent;
        while let Some(idx) = cur {
            if idx == ancestor {
                return true;
            }
            cur = self.nodes[idx].parent;
        }
        false
    }
}

/// Collect stylesheet texts for the snapshot: inline blocks first, then
/// linked sheets fetched over HTTP when the `remote` feature is enabled.
/// A sheet that fails to fetch is skipped with a warning; capture proceeds
/// with the styles that did resolve.
pub fn collect_stylesheets(snapshot: &DomSnapshot, config: &CaptureConfig) -> Result<Vec<String>> {
    let mut sheets = snapshot.inline_styles.clone();

    #[cfg(feature = "remote")]
    if !snapshot.linked_styles.is_empty() {
        let client = crate::http_client(config)
            .map_err(|e| crate::error::Error::Stylesheet(e.to_string()))?;
        for href in &snapshot.linked_styles {
            let css_url = resolve_reference(href, config.base_url.as_deref());
            match fetch_text(&client, &css_url, &config.user_agent) {
                Ok(text) if !text.trim().is_empty() => sheets.push(text),
                Ok(_) => {}
                Err(e) => warn!("skipping stylesheet {}: {}", css_url, e),
            }
        }
    }

    #[cfg(not(feature = "remote"))]
    if !snapshot.linked_styles.is_empty() {
        warn!(
            "{} linked stylesheet(s) skipped: built without the `remote` feature",
            snapshot.linked_styles.len()
        );
        let _ = config;
    }

    Ok(sheets)
}

/// Resolve a stylesheet or image reference against the configured base URL.
#[cfg(feature = "remote")]
pub(crate) fn resolve_reference(href: &str, base_url: Option<&str>) -> String {
    if let Some(base) = base_url {
        if let Ok(base) = url::Url::parse(base) {
            if let Ok(joined) = base.join(href) {
                return joined.to_string();
            }
        }
    }
    href.to_string()
}

#[cfg(feature = "remote")]
fn fetch_text(
    client: &reqwest::blocking::Client,
    url: &str,
    user_agent: &str,
) -> std::result::Result<String, String> {
    client
        .get(url)
        .header("User-Agent", user_agent)
        .send()
        .map_err(|e| e.to_string())?
        .text()
        .map_err(|e| e.to_string())
}

/// Run the normalization pass: resolve every element's effective colors
/// from the cascade and write them back as direct inline values on a
/// throwaway copy of the element list.
pub fn normalize(snapshot: &DomSnapshot, sheets: &[String]) -> NormalizedDom {
    let rules = RuleSet::parse(sheets);
    let mut nodes: Vec<NormalizedNode> = Vec::with_capacity(snapshot.nodes.len());

    // Text color inherits across the region boundary: resolve the cascade
    // down the ancestor chain so rules like `body { color: ... }` reach
    // region elements the way a live render would.
    let ambient = ambient_color(&rules, &snapshot.ancestors);

    for node in &snapshot.nodes {
        // Parents precede children in the flattened list, so the parent's
        // resolved color is always available for inheritance.
        let inherited = node.parent.map(|p| nodes[p].color).unwrap_or(ambient);

        let mut color_val: Option<String> = None;
        let mut background_val: Option<String> = None;
        let mut border_val: Option<String> = None;

        for (prop, value) in rules.cascade(node) {
            match prop {
                ColorProperty::Color => color_val = Some(value),
                ColorProperty::Background => background_val = Some(value),
                ColorProperty::Border => border_val = Some(value),
            }
        }

        // Inline style wins over every sheet rule
        if let Some((_, style)) = node.attrs.iter().find(|(k, _)| k == "style") {
            for (prop, value) in parse_declarations(style) {
                match prop {
                    ColorProperty::Color => color_val = Some(value),
                    ColorProperty::Background => background_val = Some(value),
                    ColorProperty::Border => border_val = Some(value),
                }
            }
        }

        let color = resolve_color(color_val.as_deref(), inherited, inherited);
        let background = background_val
            .as_deref()
            .and_then(Rgba::parse)
            .filter(|c| !c.is_transparent());
        let border = resolve_color(border_val.as_deref(), color, color);

        let mut attrs: Vec<(String, String)> =
            node.attrs.iter().filter(|(k, _)| k != "style").cloned().collect();
        attrs.push(("style".to_string(), inline_style(color, background, border)));

        nodes.push(NormalizedNode {
            tag: node.tag.clone(),
            id: node.id.clone(),
            classes: node.classes.clone(),
            attrs,
            text: node.text.clone(),
            parent: node.parent,
            color,
            background,
            border,
        });
    }

    NormalizedDom {
        title: snapshot.title.clone(),
        nodes,
    }
}

/// Resolve the text color inherited by the region root from the elements
/// above it.
fn ambient_color(rules: &RuleSet, ancestors: &[DomNode]) -> Rgba {
    let mut ambient = Rgba::BLACK;
    for node in ancestors {
        let mut value: Option<String> = None;
        for (prop, v) in rules.cascade(node) {
            if prop == ColorProperty::Color {
                value = Some(v);
            }
        }
        if let Some((_, style)) = node.attrs.iter().find(|(k, _)| k == "style") {
            for (prop, v) in parse_declarations(style) {
                if prop == ColorProperty::Color {
                    value = Some(v);
                }
            }
        }
        ambient = resolve_color(value.as_deref(), ambient, ambient);
    }
    ambient
}

fn resolve_color(value: Option<&str>, inherited: Rgba, current: Rgba) -> Rgba {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => inherited,
        Some(v) if v == "inherit" => inherited,
        Some(v) if v == "currentcolor" => current,
        Some(v) => match Rgba::parse(&v) {
            // A fully transparent text color still paints nothing visible;
            // treat it as inherited rather than drawing invisible glyphs.
            Some(c) if c.is_transparent() => inherited,
            Some(c) => c,
            None => inherited,
        },
    }
}

fn inline_style(color: Rgba, background: Option<Rgba>, border: Rgba) -> String {
    format!(
        "color:{};background-color:{};border-color:{}",
        color.to_hex(),
        background.map(|c| c.to_hex()).unwrap_or_else(|| "transparent".to_string()),
        border.to_hex()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Region;

    fn normalized(html: &str, selector: &str) -> NormalizedDom {
        let snap = Region::new(html, selector).snapshot().unwrap();
        normalize(&snap, &snap.inline_styles)
    }

    #[test]
    fn parses_hex_and_functional_colors() {
        assert_eq!(Rgba::parse("#ff0000"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(Rgba::parse("#F00"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(Rgba::parse("rgb(16, 32, 48)"), Some(Rgba::opaque(16, 32, 48)));
        assert_eq!(
            Rgba::parse("rgba(1,2,3,0.0)").map(|c| c.is_transparent()),
            Some(true)
        );
        assert_eq!(Rgba::parse("not-a-color"), None);
    }

    #[test]
    fn canonical_form_is_lowercase_hex() {
        assert_eq!(Rgba::opaque(255, 0, 0).to_hex(), "#ff0000");
        assert_eq!(Rgba::parse("RED").unwrap().to_hex(), "#ff0000");
    }

    #[test]
    fn id_beats_class_beats_tag() {
        let dom = normalized(
            "<html><head><style>div{color:blue}.greeting{color:green}#hello{color:red}</style>\
             </head><body><div id=\"hello\" class=\"greeting\">x</div></body></html>",
            "#hello",
        );
        assert_eq!(dom.nodes[0].color.to_hex(), "#ff0000");
    }

    #[test]
    fn later_rule_wins_equal_specificity() {
        let dom = normalized(
            "<html><head><style>.chip{color:#6b7280}.level{color:#22c55e}</style></head>\
             <body><span id=\"s\" class=\"chip level\">x</span></body></html>",
            "#s",
        );
        assert_eq!(dom.nodes[0].color.to_hex(), "#22c55e");
    }

    #[test]
    fn inline_style_wins_over_sheet() {
        let dom = normalized(
            "<html><head><style>#x{color:red}</style></head>\
             <body><div id=\"x\" style=\"color: #123456\">x</div></body></html>",
            "#x",
        );
        assert_eq!(dom.nodes[0].color.to_hex(), "#123456");
    }

    #[test]
    fn color_inherits_background_does_not() {
        let dom = normalized(
            "<html><head><style>#p{color:#112233;background-color:#445566}</style></head>\
             <body><div id=\"p\"><span>x</span></div></body></html>",
            "#p",
        );
        let child = &dom.nodes[1];
        assert_eq!(child.color.to_hex(), "#112233");
        assert!(child.background.is_none());
    }

    #[test]
    fn page_level_color_reaches_region_elements() {
        let dom = normalized(
            "<html><head><style>body{color:#111827}</style></head>\
             <body><div id=\"r\"><span>x</span></div></body></html>",
            "#r",
        );
        assert_eq!(dom.nodes[0].color.to_hex(), "#111827");
        assert_eq!(dom.nodes[1].color.to_hex(), "#111827");
    }

    #[test]
    fn transparent_background_stays_unresolved() {
        let dom = normalized(
            "<html><head><style>#p{background-color:transparent}</style></head>\
             <body><div id=\"p\">x</div></body></html>",
            "#p",
        );
        assert!(dom.nodes[0].background.is_none());
    }

    #[test]
    fn border_defaults_to_current_color() {
        let dom = normalized(
            "<html><head><style>#p{color:#3b82f6}</style></head>\
             <body><div id=\"p\">x</div></body></html>",
            "#p",
        );
        assert_eq!(dom.nodes[0].border, dom.nodes[0].color);
    }

    #[test]
    fn style_attribute_is_rewritten_with_direct_values() {
        let dom = normalized(
            "<html><head><style>#p{color:#9ca3af;background-color:#f3f4f6}</style></head>\
             <body><div id=\"p\">x</div></body></html>",
            "#p",
        );
        let style = dom.nodes[0]
            .attrs
            .iter()
            .find(|(k, _)| k == "style")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(
            style,
            "color:#9ca3af;background-color:#f3f4f6;border-color:#9ca3af"
        );
    }

    #[test]
    fn unsupported_selectors_are_skipped() {
        let sheets = vec!["div span { color: red } p:hover { color: blue } b { color: green }"
            .to_string()];
        let rules = RuleSet::parse(&sheets);
        assert_eq!(rules.rules.len(), 1);
    }

    #[test]
    fn comments_are_stripped() {
        let sheets = vec!["/* header */ h1 { color: /* inline */ #9ca3af }".to_string()];
        let rules = RuleSet::parse(&sheets);
        assert_eq!(rules.rules.len(), 1);
        assert_eq!(rules.rules[0].declarations.len(), 1);
    }
}
