//! Interactive form (AcroForm) inventory

use crate::objects::{as_dict, get, get_array, get_dict, inherited, number, resolve, text_value};
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

const FLAG_RADIO: i64 = 1 << 15;
const FLAG_PUSHBUTTON: i64 = 1 << 16;
const FLAG_COMBO: i64 = 1 << 17;

/// A widget annotation and the field it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Fully qualified name (`parent.child`)
    pub field_name: String,
    pub field_type: String,
    pub field_value: Option<String>,
    /// 0-based page index
    pub page: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormInventory {
    pub has_forms: bool,
    pub field_count: usize,
    /// Distinct field types in order of first appearance
    pub field_types: Vec<String>,
    pub fields: Vec<FormField>,
}

impl FormInventory {
    pub fn add(&mut self, field: FormField) {
        if !self.field_types.contains(&field.field_type) {
            self.field_types.push(field.field_type.clone());
        }
        self.field_count += 1;
        self.fields.push(field);
    }
}

/// Document catalog from the trailer's `Root`
pub(crate) fn catalog(doc: &Document) -> Option<&Dictionary> {
    doc.trailer
        .get(b"Root")
        .ok()
        .map(|root| resolve(doc, root))
        .and_then(as_dict)
}

/// True when the catalog's AcroForm declares at least one field
pub fn is_form_pdf(doc: &Document) -> bool {
    catalog(doc)
        .and_then(|cat| get_dict(doc, cat, b"AcroForm"))
        .and_then(|form| get_array(doc, form, b"Fields"))
        .map(|fields| !fields.is_empty())
        .unwrap_or(false)
}

/// Widgets placed on one page, in annotation order
pub fn page_fields(doc: &Document, page: &Dictionary, index: u32) -> Vec<FormField> {
    let Some(annots) = get_array(doc, page, b"Annots") else {
        return Vec::new();
    };

    annots
        .iter()
        .filter_map(|annot| as_dict(resolve(doc, annot)))
        .filter(|annot| {
            matches!(get(doc, annot, b"Subtype"), Some(Object::Name(n)) if n == b"Widget")
        })
        .map(|widget| FormField {
            field_name: qualified_name(doc, widget),
            field_type: field_type(doc, widget),
            field_value: field_value(doc, widget),
            page: index,
        })
        .collect()
}

fn qualified_name(doc: &Document, widget: &Dictionary) -> String {
    let mut parts = Vec::new();
    let mut node = Some(widget);
    let mut hops = 0;
    while let Some(current) = node {
        if let Some(partial) = get(doc, current, b"T").and_then(text_value) {
            parts.push(partial);
        }
        hops += 1;
        if hops > 32 {
            break;
        }
        node = get_dict(doc, current, b"Parent");
    }
    parts.reverse();
    parts.join(".")
}

fn field_type(doc: &Document, widget: &Dictionary) -> String {
    let flags = inherited(doc, widget, b"Ff")
        .and_then(number)
        .map(|f| f as i64)
        .unwrap_or(0);

    let kind = match inherited(doc, widget, b"FT") {
        Some(Object::Name(ft)) => String::from_utf8_lossy(ft).into_owned(),
        _ => return "Unknown".to_string(),
    };

    match kind.as_str() {
        "Tx" => "Text",
        "Btn" if flags & FLAG_PUSHBUTTON != 0 => "Button",
        "Btn" if flags & FLAG_RADIO != 0 => "RadioButton",
        "Btn" => "CheckBox",
        "Ch" if flags & FLAG_COMBO != 0 => "ComboBox",
        "Ch" => "ListBox",
        "Sig" => "Signature",
        other => other,
    }
    .to_string()
}

fn field_value(doc: &Document, widget: &Dictionary) -> Option<String> {
    match inherited(doc, widget, b"V")? {
        Object::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| text_value(resolve(doc, item)))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => text_value(other),
    }
}
