//! Original-versus-translated comparison

use crate::classify::Thresholds;
use crate::error::AnalyzeError;
use crate::report::{analyze_file, StructureReport};
use serde::Serialize;
use std::path::Path;

/// Scalar differences between two reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Differences {
    pub page_count_changed: bool,
    /// Translated size divided by original size (0 when the original is empty)
    pub file_size_ratio: f64,
    /// The translated file still carries searchable text
    pub text_preserved: bool,
    /// The set of font names differs
    pub fonts_changed: bool,
    pub rendering_approach_changed: bool,
    /// Producer recorded in the translated file
    pub producer_software: String,
}

impl Differences {
    pub fn between(original: &StructureReport, translated: &StructureReport) -> Self {
        let original_size = original.document_info.file_size;
        let file_size_ratio = if original_size == 0 {
            0.0
        } else {
            translated.document_info.file_size as f64 / original_size as f64
        };

        Self {
            page_count_changed: original.document_info.page_count
                != translated.document_info.page_count,
            file_size_ratio,
            text_preserved: translated.text_extraction.has_searchable_text,
            // Both maps are ordered, so key sequences compare as sets
            fonts_changed: !original.fonts.keys().eq(translated.fonts.keys()),
            rendering_approach_changed: original.rendering_approach
                != translated.rendering_approach,
            producer_software: translated.metadata.producer.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub original: StructureReport,
    pub translated: StructureReport,
    pub differences: Differences,
}

impl ComparisonReport {
    pub fn new(original: StructureReport, translated: StructureReport) -> Self {
        let differences = Differences::between(&original, &translated);
        Self {
            original,
            translated,
            differences,
        }
    }
}

/// Analyse both files independently and pair the reports
pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
    original: P,
    translated: Q,
    thresholds: Thresholds,
) -> Result<ComparisonReport, AnalyzeError> {
    let original = analyze_file(original, thresholds)?;
    let translated = analyze_file(translated, thresholds)?;
    Ok(ComparisonReport::new(original, translated))
}
