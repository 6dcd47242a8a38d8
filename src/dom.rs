//! Capture Region handling.
//!
//! A [`Region`] references a renderable subtree of an HTML document by
//! selector. The region owns its HTML source and parses on demand: the
//! parsed tree is not `Send`, so holding the source keeps regions cheap to
//! move across the async facade's worker boundary.
//!
//! [`Region::snapshot`] flattens the subtree into an element list with
//! parent indices in document order, which is the shape the style and
//! layout passes consume.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};

/// A reference to a renderable subtree; read-only input to the pipeline.
#[derive(Debug, Clone)]
pub struct Region {
    html: String,
    selector: String,
}

/// One element of the flattened region subtree.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    /// Direct text content of this element (not descendants), whitespace
    /// collapsed
    pub text: String,
    pub parent: Option<usize>,
}

/// Flattened view of the region plus the document-level style context.
#[derive(Debug, Clone, Default)]
pub struct DomSnapshot {
    pub title: String,
    /// Region elements in document order; parents precede children
    pub nodes: Vec<DomNode>,
    /// Elements above the region root, outermost first. Inherited style
    /// crosses the region boundary, so the chain is kept for the cascade.
    pub ancestors: Vec<DomNode>,
    /// Contents of inline `<style>` blocks in the document
    pub inline_styles: Vec<String>,
    /// `href` values of `link[rel="stylesheet"]` elements
    pub linked_styles: Vec<String>,
}

impl Region {
    pub fn new(html: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parse the document and flatten the region subtree.
    ///
    /// Fails with [`Error::RegionNotFound`] when the selector matches
    /// nothing — the "region not mounted" condition.
    pub fn snapshot(&self) -> Result<DomSnapshot> {
        let document = Html::parse_document(&self.html);

        let selector = Selector::parse(&self.selector)
            .map_err(|e| Error::Selector(format!("{}: {:?}", self.selector, e)))?;
        let root = document
            .select(&selector)
            .next()
            .ok_or_else(|| Error::RegionNotFound(self.selector.clone()))?;

        let title_sel = Selector::parse("title").unwrap();
        let title = document
            .select(&title_sel)
            .next()
            .map(|n| n.text().collect::<String>())
            .unwrap_or_default()
            .trim()
            .to_string();

        // Inline <style>
        let mut inline_styles = Vec::new();
        let style_sel = Selector::parse("style").unwrap();
        for node in document.select(&style_sel) {
            let txt = node.text().collect::<String>();
            if !txt.trim().is_empty() {
                inline_styles.push(txt);
            }
        }

        // <link rel="stylesheet" href="...">
        let mut linked_styles = Vec::new();
        let link_sel = Selector::parse("link[rel=\"stylesheet\"]").unwrap();
        for node in document.select(&link_sel) {
            if let Some(href) = node.value().attr("href") {
                linked_styles.push(href.to_string());
            }
        }

        let mut ancestors: Vec<DomNode> = root
            .ancestors()
            .filter_map(ElementRef::wrap)
            .map(|node| DomNode {
                tag: node.value().name().to_string(),
                id: node.value().attr("id").map(|s| s.to_string()),
                classes: node
                    .value()
                    .attr("class")
                    .map(|s| s.split_whitespace().map(|c| c.to_string()).collect())
                    .unwrap_or_default(),
                attrs: node
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                text: String::new(),
                parent: None,
            })
            .collect();
        ancestors.reverse();

        Ok(DomSnapshot {
            title,
            nodes: flatten(root),
            ancestors,
            inline_styles,
            linked_styles,
        })
    }
}

/// Depth-first flatten preserving document order; parent index precedes
/// every child index.
fn flatten(root: ElementRef) -> Vec<DomNode> {
    let mut nodes = Vec::new();
    let mut stack: Vec<(ElementRef, Option<usize>)> = vec![(root, None)];

    while let Some((node, parent_idx)) = stack.pop() {
        let tag = node.value().name().to_string();
        let id = node.value().attr("id").map(|s| s.to_string());
        let classes = node
            .value()
            .attr("class")
            .map(|s| s.split_whitespace().map(|c| c.to_string()).collect())
            .unwrap_or_default();
        let attrs = node
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();

        // Direct text children only; descendants carry their own text
        let text = node
            .children()
            .filter_map(|c| c.value().as_text().map(|t| t.text.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let idx = nodes.len();
        nodes.push(DomNode {
            tag,
            id,
            classes,
            attrs,
            text,
            parent: parent_idx,
        });

        // Push children in reverse order so the traversal preserves
        // document order.
        let children: Vec<_> = node.children().filter_map(ElementRef::wrap).collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(idx)));
        }
    }

    nodes
}

impl DomSnapshot {
    /// True when `ancestor` is on the parent chain of `node`.
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
