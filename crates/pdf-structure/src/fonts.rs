//! Font inventory

use crate::objects::{get, get_array, get_dict, get_name, resolve};
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use std::collections::BTreeMap;

/// A font referenced by the document, keyed by its name in [`FontInventory`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontInfo {
    pub name: String,
    /// Font subtype (`Type1`, `TrueType`, `Type0`, ...)
    #[serde(rename = "type")]
    pub font_type: String,
    pub encoding: String,
    /// 0-based indices of pages referencing the font
    pub pages_used: Vec<u32>,
    pub is_embedded: bool,
}

pub type FontInventory = BTreeMap<String, FontInfo>;

/// Descriptor entries holding an embedded font program
const FONT_FILE_KEYS: [&[u8]; 3] = [b"FontFile", b"FontFile2", b"FontFile3"];

impl FontInfo {
    /// Describe a font dictionary; `resource_key` names fonts lacking `BaseFont`
    pub fn from_dict(doc: &Document, resource_key: &str, dict: &Dictionary) -> Self {
        let name = get_name(doc, dict, b"BaseFont").unwrap_or_else(|| resource_key.to_string());
        let font_type = get_name(doc, dict, b"Subtype").unwrap_or_default();

        Self {
            is_embedded: is_embedded(doc, dict, &name, &font_type),
            name,
            font_type,
            encoding: encoding_name(doc, dict),
            pages_used: Vec::new(),
        }
    }

    /// Record a page, ignoring repeats
    pub fn mark_page(&mut self, page: u32) {
        if !self.pages_used.contains(&page) {
            self.pages_used.push(page);
        }
    }
}

/// Subset fonts carry a six-letter tag such as `ABCDEF+Arial`
pub fn has_subset_tag(name: &str) -> bool {
    match name.split_once('+') {
        Some((tag, _)) => tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()),
        None => false,
    }
}

fn is_embedded(doc: &Document, dict: &Dictionary, name: &str, font_type: &str) -> bool {
    // Type3 glyphs are content streams inside the font dictionary
    if font_type == "Type3" || has_subset_tag(name) {
        return true;
    }

    let descriptor = if font_type == "Type0" {
        get_array(doc, dict, b"DescendantFonts")
            .and_then(|fonts| fonts.first())
            .and_then(|descendant| match resolve(doc, descendant) {
                Object::Dictionary(d) => get_dict(doc, d, b"FontDescriptor"),
                _ => None,
            })
    } else {
        get_dict(doc, dict, b"FontDescriptor")
    };

    descriptor
        .map(|d| FONT_FILE_KEYS.iter().any(|key| d.has(key)))
        .unwrap_or(false)
}

fn encoding_name(doc: &Document, dict: &Dictionary) -> String {
    match get(doc, dict, b"Encoding") {
        Some(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
        Some(Object::Dictionary(enc)) => {
            get_name(doc, enc, b"BaseEncoding").unwrap_or_else(|| "Custom".to_string())
        }
        Some(Object::Stream(_)) => "CMap".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    #[test]
    fn test_subset_tag_detection() {
        assert!(has_subset_tag("ABCDEF+ArialMT"));
        assert!(!has_subset_tag("Helvetica"));
        assert!(!has_subset_tag("abc+Foo"));
    }

    #[test]
    fn test_standard_font_is_not_embedded() {
        let doc = Document::with_version("1.7");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        };
        let info = FontInfo::from_dict(&doc, "F1", &font);
        assert_eq!(info.name, "Helvetica");
        assert_eq!(info.font_type, "Type1");
        assert_eq!(info.encoding, "WinAnsiEncoding");
        assert!(!info.is_embedded);
    }

    #[test]
    fn test_font_file_in_descendant_marks_type0_embedded() {
        let mut doc = Document::with_version("1.7");
        let file_id = doc.add_object(Stream::new(Dictionary::new(), vec![0u8; 4]));
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "NotoSans",
            "FontFile2" => file_id,
        });
        let descendant_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => "NotoSans",
            "FontDescriptor" => descriptor_id,
        });
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "NotoSans",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![descendant_id.into()],
        };
        let info = FontInfo::from_dict(&doc, "F2", &font);
        assert!(info.is_embedded);
        assert_eq!(info.encoding, "Identity-H");
    }

    #[test]
    fn test_missing_base_font_uses_resource_key() {
        let doc = Document::with_version("1.7");
        let font = dictionary! { "Type" => "Font", "Subtype" => "Type3" };
        let info = FontInfo::from_dict(&doc, "T3", &font);
        assert_eq!(info.name, "T3");
        assert!(info.is_embedded);
    }

    #[test]
    fn test_mark_page_deduplicates() {
        let doc = Document::with_version("1.7");
        let mut info = FontInfo::from_dict(&doc, "F1", &Dictionary::new());
        info.mark_page(0);
        info.mark_page(0);
        info.mark_page(2);
        assert_eq!(info.pages_used, vec![0, 2]);
    }
}
