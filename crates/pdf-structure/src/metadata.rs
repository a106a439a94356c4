//! Document information dictionary and general properties

use crate::objects::{as_dict, get, resolve, text_value};
use lopdf::Document;
use serde::Serialize;

/// Info dictionary entries; absent entries are empty strings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub producer: String,
    pub creator: String,
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    #[serde(rename = "modDate")]
    pub mod_date: String,
}

impl Metadata {
    pub fn from_document(doc: &Document) -> Self {
        let Some(info) = doc
            .trailer
            .get(b"Info")
            .ok()
            .map(|obj| resolve(doc, obj))
            .and_then(as_dict)
        else {
            return Self::default();
        };

        let field = |key: &[u8]| {
            get(doc, info, key)
                .and_then(text_value)
                .unwrap_or_default()
        };

        Self {
            producer: field(b"Producer"),
            creator: field(b"Creator"),
            title: field(b"Title"),
            author: field(b"Author"),
            subject: field(b"Subject"),
            keywords: field(b"Keywords"),
            creation_date: field(b"CreationDate"),
            mod_date: field(b"ModDate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub is_encrypted: bool,
    pub is_form_pdf: bool,
    /// PDF is a fixed-layout format
    pub is_reflowable: bool,
    pub pdf_version: String,
    pub file_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, StringFormat};

    #[test]
    fn test_reads_info_dictionary() {
        let mut doc = Document::with_version("1.7");
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::String(b"DeepL".to_vec(), StringFormat::Literal),
            "Title" => Object::String(
                vec![0xFE, 0xFF, 0x00, b'M', 0x00, b'e', 0x00, b'n', 0x00, b'u'],
                StringFormat::Hexadecimal,
            ),
        });
        doc.trailer.set("Info", info_id);

        let metadata = Metadata::from_document(&doc);
        assert_eq!(metadata.producer, "DeepL");
        assert_eq!(metadata.title, "Menu");
        assert_eq!(metadata.author, "");
    }

    #[test]
    fn test_missing_info_is_empty() {
        let doc = Document::with_version("1.7");
        assert_eq!(Metadata::from_document(&doc), Metadata::default());
    }

    #[test]
    fn test_date_keys_use_camel_case() {
        let json = serde_json::to_value(Metadata::default()).unwrap();
        assert!(json.get("creationDate").is_some());
        assert!(json.get("modDate").is_some());
    }
}
