//! Placeholder PDF generation
//!
//! Writes single-page Helvetica PDFs used as stand-ins for samples that
//! cannot be fetched or translated.

pub mod error;
pub mod metrics;
pub mod page;

pub use error::PlaceholderError;
pub use metrics::text_width;
pub use page::{centered_x, PlaceholderPage, TextLine, LETTER_HEIGHT, LETTER_WIDTH};

use std::path::Path;

pub const DEFAULT_OUTPUT: &str = "placeholder.pdf";
pub const DEFAULT_MESSAGE: &str = "Google cannot translate scanned PDFs";
pub const CAPTION: &str = "This is a placeholder for translation testing";

const MESSAGE_SIZE: f64 = 24.0;
const CAPTION_SIZE: f64 = 12.0;
const CAPTION_GAP: f64 = 30.0;

/// Letter page with `message` centred at mid-height and the caption below it
pub fn translation_placeholder(message: &str) -> PlaceholderPage {
    let y = LETTER_HEIGHT / 2.0;
    PlaceholderPage::letter()
        .centered_line(message, MESSAGE_SIZE, y)
        .centered_line(CAPTION, CAPTION_SIZE, y - CAPTION_GAP)
}

/// Write the translation placeholder to `output`
pub fn create_placeholder_pdf<P: AsRef<Path>>(
    output: P,
    message: &str,
) -> Result<PlaceholderPage, PlaceholderError> {
    let page = translation_placeholder(message);
    page.save(output.as_ref())?;
    Ok(page)
}
