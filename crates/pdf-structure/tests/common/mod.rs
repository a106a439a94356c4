//! In-process PDF fixtures built with lopdf

#![allow(dead_code)]

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

pub const LETTER: (i64, i64) = (612, 792);

/// What to draw on a fixture page
#[derive(Debug, Clone, Default)]
pub struct PageSpec {
    pub text: Option<String>,
    /// Draw the text with `3 Tr` (invisible), as OCR layers do
    pub invisible_text: bool,
    pub full_page_image: bool,
    /// Paint the full-page image inline (`BI ... ID ... EI`) with binary data
    pub inline_image: bool,
    pub rectangles: usize,
}

impl PageSpec {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn scanned() -> Self {
        Self {
            full_page_image: true,
            ..Self::default()
        }
    }

    pub fn scanned_with_ocr(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            invisible_text: true,
            full_page_image: true,
            inline_image: false,
            rectangles: 0,
        }
    }

    pub fn inline_scan_with_ocr(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            invisible_text: true,
            inline_image: true,
            ..Self::default()
        }
    }
}

/// Options that apply to the whole fixture document
#[derive(Debug, Clone)]
pub struct DocSpec {
    pub base_font: String,
    pub producer: Option<String>,
    pub form_field: Option<String>,
}

impl Default for DocSpec {
    fn default() -> Self {
        Self {
            base_font: "Helvetica".to_string(),
            producer: None,
            form_field: None,
        }
    }
}

pub fn build_pdf(pages: &[PageSpec]) -> Vec<u8> {
    build_pdf_with(pages, &DocSpec::default())
}

pub fn build_pdf_with(pages: &[PageSpec], spec: &DocSpec) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => spec.base_font.as_str(),
        "Encoding" => "WinAnsiEncoding",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8, 255, 255, 0],
    ));

    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut widget_ids: Vec<ObjectId> = Vec::new();

    for page in pages {
        let mut ops: Vec<u8> = Vec::new();
        if page.full_page_image {
            ops.extend(format!("q {} 0 0 {} 0 0 cm /Im0 Do Q\n", LETTER.0, LETTER.1).bytes());
        }
        if page.inline_image {
            ops.extend(format!("q {} 0 0 {} 0 0 cm\n", LETTER.0, LETTER.1).bytes());
            ops.extend_from_slice(b"BI /W 2 /H 2 /CS /G /BPC 8 ID ");
            ops.extend_from_slice(&[0x00, 0xff, 0x80, 0x29]);
            ops.extend_from_slice(b"\nEI Q\n");
        }
        for i in 0..page.rectangles {
            ops.extend(format!("{} 100 50 50 re f\n", 50 + i * 60).bytes());
        }
        if let Some(text) = &page.text {
            let mode = if page.invisible_text { 3 } else { 0 };
            ops.extend(format!("BT {} Tr /F1 12 Tf 72 700 Td ({}) Tj ET\n", mode, text).bytes());
        }

        // Only reference what the page draws, so resource scans stay exact
        let mut resources = Dictionary::new();
        if page.text.is_some() {
            resources.set("Font", dictionary! { "F1" => font_id });
        }
        if page.full_page_image {
            resources.set("XObject", dictionary! { "Im0" => image_id });
        }

        let content_id = doc.add_object(Stream::new(Dictionary::new(), ops));
        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), LETTER.0.into(), LETTER.1.into()],
            "Contents" => content_id,
            "Resources" => resources,
        };

        if let Some(name) = &spec.form_field {
            let widget_id = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Widget",
                "FT" => "Tx",
                "T" => Object::String(name.as_bytes().to_vec(), StringFormat::Literal),
                "Rect" => vec![100.into(), 100.into(), 300.into(), 130.into()],
            });
            page_dict.set("Annots", vec![Object::Reference(widget_id)]);
            widget_ids.push(widget_id);
        }

        page_ids.push(doc.add_object(page_dict));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !widget_ids.is_empty() {
        catalog.set(
            "AcroForm",
            dictionary! {
                "Fields" => widget_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            },
        );
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    if let Some(producer) = &spec.producer {
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::String(producer.as_bytes().to_vec(), StringFormat::Literal),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Write fixture bytes into `dir` and return the path
pub fn write_fixture(dir: &std::path::Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
