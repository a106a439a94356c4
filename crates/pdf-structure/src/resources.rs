//! Resource dictionary traversal
//!
//! Collects the fonts and image XObjects a page can reference, descending
//! into Form XObjects the way viewers resolve nested resources.

use crate::objects::{as_dict, get_dict, get_name, inherited, resolve};
use lopdf::{Dictionary, Document, ObjectId, Stream};
use std::collections::HashSet;

const MAX_FORM_DEPTH: usize = 8;

/// Fonts (resource key, font dictionary) and images reachable from a page
#[derive(Debug, Default)]
pub(crate) struct PageResources<'a> {
    pub fonts: Vec<(String, &'a Dictionary)>,
    /// Image XObject streams, each listed once per page
    pub images: Vec<&'a Stream>,
    seen: HashSet<ObjectId>,
}

impl<'a> PageResources<'a> {
    pub fn scan(doc: &'a Document, page: &'a Dictionary) -> Self {
        let mut resources = Self::default();
        if let Some(dict) = inherited(doc, page, b"Resources").and_then(as_dict) {
            resources.visit(doc, dict, 0);
        }
        resources
    }

    fn visit(&mut self, doc: &'a Document, resources: &'a Dictionary, depth: usize) {
        if let Some(fonts) = get_dict(doc, resources, b"Font") {
            for (key, value) in fonts.iter() {
                if let Some(font) = as_dict(resolve(doc, value)) {
                    self.fonts
                        .push((String::from_utf8_lossy(key).into_owned(), font));
                }
            }
        }

        let Some(xobjects) = get_dict(doc, resources, b"XObject") else {
            return;
        };
        for (_, value) in xobjects.iter() {
            if let Ok(id) = value.as_reference() {
                if !self.seen.insert(id) {
                    continue;
                }
            }
            let Ok(stream) = resolve(doc, value).as_stream() else {
                continue;
            };
            match get_name(doc, &stream.dict, b"Subtype").as_deref() {
                Some("Image") => self.images.push(stream),
                Some("Form") if depth < MAX_FORM_DEPTH => {
                    if let Some(nested) = get_dict(doc, &stream.dict, b"Resources") {
                        self.visit(doc, nested, depth + 1);
                    }
                }
                _ => {}
            }
        }
    }
}
