//! Structure analysis report

use crate::classify::{classify, DocumentStats, RenderingApproach, Thresholds};
use crate::content;
use crate::error::AnalyzeError;
use crate::fonts::{FontInfo, FontInventory};
use crate::forms::{self, FormInventory};
use crate::images::{colorspace_name, ImageInventory, ImageInventoryBuilder};
use crate::metadata::{DocumentInfo, Metadata};
use crate::objects::as_dict;
use crate::page::{PageAnalysis, PageGeometry};
use crate::resources::PageResources;
use crate::text::{self, SampledPage, TextExtraction, SAMPLE_PAGES};
use lopdf::Document;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Everything learned about one PDF
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureReport {
    pub filename: String,
    pub metadata: Metadata,
    pub document_info: DocumentInfo,
    pub pages: Vec<PageAnalysis>,
    pub fonts: FontInventory,
    pub images: ImageInventory,
    pub form_fields: FormInventory,
    pub text_extraction: TextExtraction,
    pub rendering_approach: RenderingApproach,
}

/// A parsed PDF ready to be analysed
pub struct StructureAnalyzer {
    doc: Document,
    filename: String,
    file_size: u64,
    thresholds: Thresholds,
}

impl StructureAnalyzer {
    /// Open and parse a PDF file
    pub fn open<P: AsRef<Path>>(path: P, thresholds: Thresholds) -> Result<Self, AnalyzeError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| AnalyzeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_bytes(filename, &bytes, thresholds)
    }

    /// Parse a PDF already held in memory
    pub fn from_bytes(
        filename: impl Into<String>,
        bytes: &[u8],
        thresholds: Thresholds,
    ) -> Result<Self, AnalyzeError> {
        thresholds.validate()?;
        let doc = Document::load_mem(bytes)?;
        let filename = filename.into();
        tracing::debug!(
            "Loaded {} ({} bytes, {} pages)",
            filename,
            bytes.len(),
            doc.get_pages().len()
        );

        Ok(Self {
            doc,
            filename,
            file_size: bytes.len() as u64,
            thresholds,
        })
    }

    /// Walk every page once and assemble the report
    pub fn analyze(&self) -> StructureReport {
        let doc = &self.doc;
        let thresholds = &self.thresholds;
        let pages = doc.get_pages();
        let form_pdf = forms::is_form_pdf(doc);

        let mut page_reports = Vec::with_capacity(pages.len());
        let mut fonts = FontInventory::new();
        let mut images = ImageInventoryBuilder::new();
        let mut form_fields = FormInventory {
            has_forms: form_pdf,
            ..FormInventory::default()
        };
        let mut samples = Vec::with_capacity(SAMPLE_PAGES);
        let mut stats = DocumentStats {
            total_pages: pages.len(),
            ..DocumentStats::default()
        };

        for (index, (page_number, page_id)) in pages.iter().enumerate() {
            let index = index as u32;
            let Some(page) = doc.get_object(*page_id).ok().and_then(as_dict) else {
                tracing::warn!("Page {} is not a dictionary, skipping", page_number);
                continue;
            };

            let geometry = PageGeometry::from_page(doc, page);
            let layout = content::walk_page(doc, *page_id);
            let resources = PageResources::scan(doc, page);

            for (key, dict) in &resources.fonts {
                let info = FontInfo::from_dict(doc, key, dict);
                fonts
                    .entry(info.name.clone())
                    .or_insert(info)
                    .mark_page(index);
            }

            let image_count = resources.images.len() + layout.inline_images;
            images.add_page(index, image_count);
            for image in &resources.images {
                images.add_format(colorspace_name(doc, &image.dict));
            }

            if form_pdf {
                for field in forms::page_fields(doc, page, index) {
                    form_fields.add(field);
                }
            }

            let mut characters = text::page_text(doc, *page_number).chars().count();
            if layout.inline_images > 0 {
                // Text extraction stops at inline image data
                characters = characters.max(layout.glyph_count());
            }
            let analysis =
                PageAnalysis::from_layout(index, &geometry, &layout, image_count, thresholds);

            if samples.len() < SAMPLE_PAGES {
                samples.push(SampledPage {
                    characters,
                    text_blocks: analysis.text_blocks,
                    has_images: analysis.has_images,
                    render_modes: layout.render_modes.clone(),
                });
            }
            if analysis.has_images {
                stats.pages_with_images += 1;
            }
            stats.has_text |= characters > thresholds.min_text_chars;

            tracing::debug!(
                "Page {}: {} text blocks, {} images, coverage {:.1}%",
                index,
                analysis.text_blocks,
                image_count,
                analysis.text_coverage
            );
            page_reports.push(analysis);
        }

        stats.embedded_fonts = fonts.values().filter(|f| f.is_embedded).count();
        let rendering_approach = classify(&stats, thresholds);
        tracing::info!("{}: {:?}", self.filename, rendering_approach);

        StructureReport {
            filename: self.filename.clone(),
            metadata: Metadata::from_document(doc),
            document_info: DocumentInfo {
                page_count: pages.len(),
                is_encrypted: doc.is_encrypted(),
                is_form_pdf: form_pdf,
                is_reflowable: false,
                pdf_version: doc.version.clone(),
                file_size: self.file_size,
            },
            pages: page_reports,
            fonts,
            images: images.build(),
            form_fields,
            text_extraction: TextExtraction::summarize(&samples, thresholds),
            rendering_approach,
        }
    }
}

/// Open, parse and analyse a PDF file
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    thresholds: Thresholds,
) -> Result<StructureReport, AnalyzeError> {
    Ok(StructureAnalyzer::open(path, thresholds)?.analyze())
}
