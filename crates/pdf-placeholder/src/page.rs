//! Single-page text layout and PDF serialization

use crate::error::PlaceholderError;
use crate::metrics::{text_width, to_win_ansi};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::fs;
use std::path::Path;

/// US Letter in points
pub const LETTER_WIDTH: f64 = 612.0;
pub const LETTER_HEIGHT: f64 = 792.0;

/// Resource name of the page's only font
const FONT_RESOURCE: &str = "F1";

/// One line of Helvetica text at an absolute position
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
}

/// A single page of Helvetica text lines
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderPage {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<TextLine>,
}

impl Default for PlaceholderPage {
    fn default() -> Self {
        Self::letter()
    }
}

impl PlaceholderPage {
    pub fn letter() -> Self {
        Self {
            width: LETTER_WIDTH,
            height: LETTER_HEIGHT,
            lines: Vec::new(),
        }
    }

    /// Add a line at a fixed position
    pub fn line(mut self, text: &str, font_size: f64, x: f64, y: f64) -> Self {
        self.lines.push(TextLine {
            text: text.to_string(),
            font_size,
            x,
            y,
        });
        self
    }

    /// Add a line centred horizontally: x = (page width - text width) / 2
    pub fn centered_line(self, text: &str, font_size: f64, y: f64) -> Self {
        let x = centered_x(text, font_size, self.width);
        self.line(text, font_size, x, y)
    }

    /// Serialize to PDF bytes
    pub fn render(&self) -> Result<Vec<u8>, PlaceholderError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut operations = Vec::with_capacity(self.lines.len() * 5);
        for line in &self.lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    Object::Real(line.font_size as f32),
                ],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(line.x as f32), Object::Real(line.y as f32)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(&line.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(self.width as f32),
                Object::Real(self.height as f32),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { FONT_RESOURCE => font_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Render and write to `path`; parent directories must exist
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PlaceholderError> {
        let path = path.as_ref();
        let bytes = self.render()?;
        fs::write(path, bytes).map_err(|source| PlaceholderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Wrote {} line placeholder to {}", self.lines.len(), path.display());
        Ok(())
    }
}

/// Left edge that centres `text` on a page `page_width` wide
pub fn centered_x(text: &str, font_size: f64, page_width: f64) -> f64 {
    (page_width - text_width(text, font_size)) / 2.0
}
