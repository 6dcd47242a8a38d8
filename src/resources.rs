//! Image resources referenced by the capture region.
//!
//! Images must be fetchable in a way that permits inclusion in the raster:
//! `data:` URIs are decoded inline, and `http(s)` references are fetched
//! with a permissive blocking client when the `remote` feature is enabled.
//! Only PNG payloads are decoded. A resource that cannot be fetched or
//! decoded degrades to a placeholder at paint time; rasterization itself
//! stays quiet about it apart from a debug line.

use std::collections::HashMap;

use base64::Engine as _;
use log::debug;
use tiny_skia::Pixmap;

use crate::error::{Error, Result};
use crate::style::NormalizedDom;
use crate::CaptureConfig;

/// Decoded images keyed by the index of their `<img>` node.
#[derive(Debug, Default)]
pub struct ImageSet {
    map: HashMap<usize, Pixmap>,
}

impl ImageSet {
    pub fn get(&self, node: usize) -> Option<&Pixmap> {
        self.map.get(&node)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Fetch and decode every `<img>` in the region.
pub fn fetch_images(dom: &NormalizedDom, config: &CaptureConfig) -> ImageSet {
    let mut set = ImageSet::default();

    #[cfg(feature = "remote")]
    let mut client: Option<reqwest::blocking::Client> = None;
    #[cfg(not(feature = "remote"))]
    let _ = config;

    for (idx, node) in dom.nodes.iter().enumerate() {
        if node.tag != "img" {
            continue;
        }
        let Some((_, src)) = node.attrs.iter().find(|(k, _)| k == "src") else {
            continue;
        };

        let loaded = if src.starts_with("data:") {
            decode_data_uri(src)
        } else {
            #[cfg(feature = "remote")]
            {
                let client = match &client {
                    Some(c) => c.clone(),
                    None => match crate::http_client(config) {
                        Ok(c) => {
                            client = Some(c.clone());
                            c
                        }
                        Err(e) => {
                            debug!("image client unavailable: {}", e);
                            continue;
                        }
                    },
                };
                fetch_remote(&client, src, config)
            }
            #[cfg(not(feature = "remote"))]
            {
                Err(Error::Resource(format!(
                    "{}: built without the `remote` feature",
                    src
                )))
            }
        };

        match loaded {
            Ok(pixmap) => {
                set.map.insert(idx, pixmap);
            }
            Err(e) => debug!("image {} skipped: {}", src, e),
        }
    }

    set
}

/// Decode a `data:image/...;base64,...` URI into a pixmap.
pub fn decode_data_uri(uri: &str) -> Result<Pixmap> {
    let body = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::Resource("not a data URI".to_string()))?;
    let (meta, payload) = body
        .split_once(',')
        .ok_or_else(|| Error::Resource("malformed data URI".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(Error::Resource("only base64 data URIs are supported".to_string()));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::Resource(format!("base64 decode failed: {}", e)))?;
    decode_png(&bytes)
}

fn decode_png(bytes: &[u8]) -> Result<Pixmap> {
    Pixmap::decode_png(bytes).map_err(|e| Error::Resource(format!("PNG decode failed: {}", e)))
}

#[cfg(feature = "remote")]
fn fetch_remote(
    client: &reqwest::blocking::Client,
    src: &str,
    config: &CaptureConfig,
) -> Result<Pixmap> {
    let url = crate::style::resolve_reference(src, config.base_url.as_deref());
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::Resource(format!("unsupported reference: {}", url)));
    }
    let bytes = client
        .get(&url)
        .header("User-Agent", config.user_agent.clone())
        .send()
        .map_err(|e| Error::Resource(format!("{}: {}", url, e)))?
        .bytes()
        .map_err(|e| Error::Resource(format!("{}: {}", url, e)))?;
    decode_png(&bytes)
}
