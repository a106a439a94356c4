//! Text extraction summary

use crate::classify::Thresholds;
use lopdf::Document;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of leading pages sampled for the extraction summary
pub const SAMPLE_PAGES: usize = 3;

/// Extracted text of one page (1-based page number); empty when extraction fails
pub fn page_text(doc: &Document, page_number: u32) -> String {
    doc.extract_text(&[page_number]).unwrap_or_else(|e| {
        tracing::warn!("Text extraction failed on page {}: {}", page_number, e);
        String::new()
    })
}

/// What the sampled pages offer to text extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExtractionMethods {
    /// Plain text came out of the page
    pub raw: bool,
    /// The page has positioned text blocks
    pub blocks: bool,
    /// The page has any structured content (text blocks or images)
    pub dict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextExtraction {
    pub extraction_methods: ExtractionMethods,
    pub total_characters: usize,
    pub has_searchable_text: bool,
    /// Most common `Tr` mode among shown glyphs (3 = invisible, usual for OCR layers)
    pub text_rendering_mode: Option<i64>,
}

/// Per-page figures fed into [`TextExtraction::summarize`]
#[derive(Debug, Clone, Default)]
pub struct SampledPage {
    pub characters: usize,
    pub text_blocks: usize,
    pub has_images: bool,
    pub render_modes: BTreeMap<i64, usize>,
}

impl TextExtraction {
    pub fn summarize(samples: &[SampledPage], thresholds: &Thresholds) -> Self {
        let mut summary = Self::default();
        let mut modes: BTreeMap<i64, usize> = BTreeMap::new();

        for page in samples.iter().take(SAMPLE_PAGES) {
            summary.extraction_methods.raw |= page.characters > 0;
            summary.extraction_methods.blocks |= page.text_blocks > 0;
            summary.extraction_methods.dict |= page.text_blocks > 0 || page.has_images;
            summary.total_characters += page.characters;
            summary.has_searchable_text |= page.characters > thresholds.min_text_chars;
            for (mode, glyphs) in &page.render_modes {
                *modes.entry(*mode).or_insert(0) += glyphs;
            }
        }

        // Ties resolve to the lowest mode
        summary.text_rendering_mode = modes
            .iter()
            .rev()
            .max_by_key(|(_, glyphs)| **glyphs)
            .map(|(mode, _)| *mode);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(characters: usize, text_blocks: usize, modes: &[(i64, usize)]) -> SampledPage {
        SampledPage {
            characters,
            text_blocks,
            has_images: false,
            render_modes: modes.iter().copied().collect(),
        }
    }

    #[test]
    fn test_only_first_three_pages_are_sampled() {
        let pages = vec![
            sample(5, 1, &[]),
            sample(5, 1, &[]),
            sample(5, 1, &[]),
            sample(500, 10, &[]),
        ];
        let summary = TextExtraction::summarize(&pages, &Thresholds::default());
        assert_eq!(summary.total_characters, 15);
        assert!(!summary.has_searchable_text);
        assert!(summary.extraction_methods.raw);
    }

    #[test]
    fn test_dominant_render_mode() {
        let pages = vec![sample(40, 2, &[(0, 10), (3, 30)]), sample(0, 0, &[(0, 5)])];
        let summary = TextExtraction::summarize(&pages, &Thresholds::default());
        assert_eq!(summary.text_rendering_mode, Some(3));
        assert!(summary.has_searchable_text);
    }

    #[test]
    fn test_render_mode_tie_prefers_lowest() {
        let pages = vec![sample(40, 2, &[(0, 10), (3, 10)])];
        let summary = TextExtraction::summarize(&pages, &Thresholds::default());
        assert_eq!(summary.text_rendering_mode, Some(0));
    }

    #[test]
    fn test_no_pages_means_no_text() {
        let summary = TextExtraction::summarize(&[], &Thresholds::default());
        assert_eq!(summary, TextExtraction::default());
    }
}
