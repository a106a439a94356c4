//! Stand-in PDFs for manifest entries that have no downloadable source

use pdf_placeholder::PlaceholderPage;

const LEFT_MARGIN: f64 = 100.0;
const FONT_SIZE: f64 = 12.0;

/// Extra lines for the `simple` category, starting at y = 650
const SIMPLE_TEXT: &[&str] = &[
    "Sample Text Content",
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
    "\u{2022} Bullet point one",
    "\u{2022} Bullet point two",
    "\u{2022} Bullet point three",
];

/// Letter page naming the sample and its category
pub fn sample_placeholder(id: &str, category: &str) -> PlaceholderPage {
    let header = [
        format!("Placeholder PDF: {}", id),
        format!("Category: {}", category),
        "This is a placeholder for testing.".to_string(),
        "Replace with actual sample when available.".to_string(),
    ];

    let mut page = PlaceholderPage::letter();
    for (i, text) in header.iter().enumerate() {
        page = page.line(text, FONT_SIZE, LEFT_MARGIN, 750.0 - 20.0 * i as f64);
    }
    if category == "simple" {
        for (i, text) in SIMPLE_TEXT.iter().enumerate() {
            page = page.line(text, FONT_SIZE, LEFT_MARGIN, 650.0 - 20.0 * i as f64);
        }
    }
    page
}
