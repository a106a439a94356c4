//! Image inventory and colorspace introspection

use crate::objects::{as_dict, get, get_name, name, number, resolve};
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder for colorspaces that could not be determined
pub const UNKNOWN_COLORSPACE: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageInventory {
    pub total_count: usize,
    /// Image count per 0-based page index; pages without images are omitted
    pub by_page: BTreeMap<u32, usize>,
    /// Distinct colorspace names, sorted
    pub formats: Vec<String>,
}

/// Accumulates per-page image counts into an [`ImageInventory`]
#[derive(Debug, Default)]
pub struct ImageInventoryBuilder {
    total_count: usize,
    by_page: BTreeMap<u32, usize>,
    formats: BTreeSet<String>,
}

impl ImageInventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: u32, count: usize) {
        if count > 0 {
            self.by_page.insert(page, count);
            self.total_count += count;
        }
    }

    pub fn add_format(&mut self, format: String) {
        self.formats.insert(format);
    }

    pub fn build(self) -> ImageInventory {
        ImageInventory {
            total_count: self.total_count,
            by_page: self.by_page,
            formats: self.formats.into_iter().collect(),
        }
    }
}

/// Colorspace of an image XObject, or [`UNKNOWN_COLORSPACE`]
pub fn colorspace_name(doc: &Document, image: &Dictionary) -> String {
    let resolved = match image.get(b"ColorSpace") {
        Ok(obj) => colorspace_family(doc, resolve(doc, obj), 0),
        // Stencil masks have no colorspace and paint with one component
        Err(_) if matches!(get(doc, image, b"ImageMask"), Some(Object::Boolean(true))) => {
            Some("DeviceGray".to_string())
        }
        Err(_) => None,
    };

    resolved.unwrap_or_else(|| {
        tracing::debug!("Image colorspace could not be determined");
        UNKNOWN_COLORSPACE.to_string()
    })
}

fn colorspace_family(doc: &Document, obj: &Object, depth: usize) -> Option<String> {
    if depth > 4 {
        return None;
    }
    match obj {
        Object::Name(_) => name(obj).map(|n| expand_abbreviation(&n)),
        Object::Array(items) => {
            let family = items.first().map(|o| resolve(doc, o)).and_then(name)?;
            match family.as_str() {
                "ICCBased" => {
                    let profile = items.get(1).map(|o| resolve(doc, o)).and_then(as_dict)?;
                    let components = get(doc, profile, b"N").and_then(number)? as i64;
                    match components {
                        1 => Some("DeviceGray".to_string()),
                        3 => Some("DeviceRGB".to_string()),
                        4 => Some("DeviceCMYK".to_string()),
                        _ => get_name(doc, profile, b"Alternate"),
                    }
                }
                "Indexed" | "I" => {
                    let base = items.get(1).map(|o| resolve(doc, o))?;
                    colorspace_family(doc, base, depth + 1)
                }
                other => Some(expand_abbreviation(other)),
            }
        }
        _ => None,
    }
}

/// Inline-image abbreviations (`/G`, `/RGB`, `/CMYK`)
fn expand_abbreviation(name: &str) -> String {
    match name {
        "G" => "DeviceGray",
        "RGB" => "DeviceRGB",
        "CMYK" => "DeviceCMYK",
        other => other,
    }
    .to_string()
}
