//! Rendering-approach heuristic
//!
//! Guesses how a PDF was produced (or translated) from a handful of
//! aggregate counts. The thresholds are hand-picked and therefore exposed as
//! [`Thresholds`] rather than baked in.

use crate::error::AnalyzeError;
use serde::{Deserialize, Serialize};

/// Tunable cut-offs used by the page and document heuristics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Share of pages carrying images above which a document counts as raster
    pub image_page_ratio: f64,
    /// Share of page area an image must cover for the page to look scanned
    pub scan_image_area_ratio: f64,
    /// A scanned-looking page has fewer text blocks than this
    pub scan_max_text_blocks: usize,
    /// A page "has text" when it yields more characters than this
    pub min_text_chars: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            image_page_ratio: 0.8,
            scan_image_area_ratio: 0.8,
            scan_max_text_blocks: 3,
            min_text_chars: 10,
        }
    }
}

impl Thresholds {
    /// Reject ratios outside `[0, 1]`
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        for (label, value) in [
            ("image_page_ratio", self.image_page_ratio),
            ("scan_image_area_ratio", self.scan_image_area_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalyzeError::InvalidThreshold(format!(
                    "{} must be within [0, 1], got {}",
                    label, value
                )));
            }
        }
        Ok(())
    }
}

/// Likely approach used to create or translate the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderingApproach {
    /// Every page is an image, nothing extractable
    FullRasterization,
    /// Page images with a text layer on top (typically invisible OCR text)
    ImageWithOcrOverlay,
    /// Text re-typeset with embedded (often subset) fonts
    TextReplacementWithEmbedding,
    /// Text re-typeset with non-embedded fonts
    TextReplacementNative,
    Unknown,
}

/// Aggregate counts the classifier works from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub total_pages: usize,
    pub pages_with_images: usize,
    pub has_text: bool,
    pub embedded_fonts: usize,
}

impl DocumentStats {
    /// Share of pages with images; 0 for an empty document
    pub fn image_ratio(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.pages_with_images as f64 / self.total_pages as f64
        }
    }
}

/// Classify a document; checks are evaluated in order of precedence
pub fn classify(stats: &DocumentStats, thresholds: &Thresholds) -> RenderingApproach {
    let mostly_images = stats.image_ratio() > thresholds.image_page_ratio;

    if mostly_images && !stats.has_text {
        RenderingApproach::FullRasterization
    } else if mostly_images {
        RenderingApproach::ImageWithOcrOverlay
    } else if stats.embedded_fonts > 0 && stats.has_text {
        RenderingApproach::TextReplacementWithEmbedding
    } else if stats.has_text {
        RenderingApproach::TextReplacementNative
    } else {
        RenderingApproach::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stats(total: usize, images: usize, has_text: bool, embedded: usize) -> DocumentStats {
        DocumentStats {
            total_pages: total,
            pages_with_images: images,
            has_text,
            embedded_fonts: embedded,
        }
    }

    #[test]
    fn test_all_image_pages_without_text_is_rasterized() {
        let approach = classify(&stats(10, 10, false, 0), &Thresholds::default());
        assert_eq!(approach, RenderingApproach::FullRasterization);
    }

    #[test]
    fn test_all_image_pages_with_text_is_ocr_overlay() {
        let approach = classify(&stats(10, 9, true, 2), &Thresholds::default());
        assert_eq!(approach, RenderingApproach::ImageWithOcrOverlay);
    }

    #[test]
    fn test_exactly_threshold_ratio_is_not_raster() {
        // 8 of 10 pages is 0.8, which does not exceed the default cut-off
        let approach = classify(&stats(10, 8, true, 1), &Thresholds::default());
        assert_eq!(approach, RenderingApproach::TextReplacementWithEmbedding);
    }

    #[test]
    fn test_text_without_embedded_fonts_is_native() {
        let approach = classify(&stats(3, 0, true, 0), &Thresholds::default());
        assert_eq!(approach, RenderingApproach::TextReplacementNative);
    }

    #[test]
    fn test_embedded_fonts_without_text_is_unknown() {
        let approach = classify(&stats(3, 1, false, 4), &Thresholds::default());
        assert_eq!(approach, RenderingApproach::Unknown);
    }

    #[test]
    fn test_empty_document_is_unknown() {
        let approach = classify(&stats(0, 0, false, 0), &Thresholds::default());
        assert_eq!(approach, RenderingApproach::Unknown);
    }

    #[test]
    fn test_custom_ratio_changes_outcome() {
        let thresholds = Thresholds {
            image_page_ratio: 0.5,
            ..Thresholds::default()
        };
        let approach = classify(&stats(10, 6, false, 0), &thresholds);
        assert_eq!(approach, RenderingApproach::FullRasterization);
    }

    #[test]
    fn test_validate_rejects_out_of_range_ratio() {
        let thresholds = Thresholds {
            scan_image_area_ratio: 1.5,
            ..Thresholds::default()
        };
        assert!(thresholds.validate().is_err());
        assert!(Thresholds::default().validate().is_ok());
    }

    #[test]
    fn test_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&RenderingApproach::TextReplacementWithEmbedding).unwrap();
        assert_eq!(json, r#""TEXT_REPLACEMENT_WITH_EMBEDDING""#);
    }

    proptest! {
        #[test]
        fn no_image_pages_never_classified_as_raster(
            total in 0usize..500,
            has_text in any::<bool>(),
            embedded in 0usize..20,
            ratio in 0.0f64..=1.0,
        ) {
            let thresholds = Thresholds { image_page_ratio: ratio, ..Thresholds::default() };
            let approach = classify(&stats(total, 0, has_text, embedded), &thresholds);
            prop_assert_ne!(approach, RenderingApproach::FullRasterization);
            prop_assert_ne!(approach, RenderingApproach::ImageWithOcrOverlay);
        }
    }
}
