//! Per-page geometry and heuristics

use crate::classify::Thresholds;
use crate::content::PageLayout;
use crate::geometry::Rect;
use crate::objects::{inherited, number, rect};
use lopdf::{Dictionary, Document};
use serde::Serialize;

/// US Letter, used when a page carries no usable box
const DEFAULT_PAGE_BOX: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

/// Analysis of a single page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnalysis {
    /// Page index (0-based)
    pub page_number: u32,
    /// Displayed width in points (rotation applied)
    pub width: f64,
    /// Displayed height in points (rotation applied)
    pub height: f64,
    /// Rotation in degrees (0, 90, 180, 270)
    pub rotation: i64,
    pub text_blocks: usize,
    pub drawing_commands: usize,
    pub has_images: bool,
    /// Percentage of the page covered by text blocks, 0-100
    pub text_coverage: f64,
    pub is_scanned: bool,
}

/// Visible box and rotation of a page, with inherited values resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub bbox: Rect,
    pub rotation: i64,
}

impl PageGeometry {
    pub fn from_page(doc: &Document, page: &Dictionary) -> Self {
        let bbox = inherited(doc, page, b"CropBox")
            .and_then(|obj| rect(doc, obj))
            .or_else(|| inherited(doc, page, b"MediaBox").and_then(|obj| rect(doc, obj)))
            .filter(|r| r.area() > 0.0)
            .unwrap_or(DEFAULT_PAGE_BOX);

        let rotation = inherited(doc, page, b"Rotate")
            .and_then(number)
            .map(|degrees| normalize_rotation(degrees as i64))
            .unwrap_or(0);

        Self { bbox, rotation }
    }

    /// Width and height as displayed, swapping axes for quarter turns
    pub fn display_size(&self) -> (f64, f64) {
        if self.rotation == 90 || self.rotation == 270 {
            (self.bbox.height(), self.bbox.width())
        } else {
            (self.bbox.width(), self.bbox.height())
        }
    }
}

fn normalize_rotation(degrees: i64) -> i64 {
    let snapped = ((degrees as f64 / 90.0).round() as i64) * 90;
    snapped.rem_euclid(360)
}

impl PageAnalysis {
    pub fn from_layout(
        index: u32,
        geometry: &PageGeometry,
        layout: &PageLayout,
        image_count: usize,
        thresholds: &Thresholds,
    ) -> Self {
        let (width, height) = geometry.display_size();
        let text_blocks = layout.text_blocks.len();

        Self {
            page_number: index,
            width,
            height,
            rotation: geometry.rotation,
            text_blocks,
            drawing_commands: layout.drawing_commands,
            has_images: image_count > 0,
            text_coverage: text_coverage(&layout.text_blocks, &geometry.bbox),
            is_scanned: is_likely_scanned(
                &layout.image_placements,
                text_blocks,
                &geometry.bbox,
                thresholds,
            ),
        }
    }
}

/// Percentage of `page` covered by `blocks`
///
/// Blocks are clipped to the page and the sum is capped at 100, so
/// overlapping blocks cannot push the result out of range.
pub fn text_coverage(blocks: &[Rect], page: &Rect) -> f64 {
    let page_area = page.area();
    if blocks.is_empty() || page_area <= 0.0 {
        return 0.0;
    }

    let text_area: f64 = blocks
        .iter()
        .filter_map(|block| block.intersect(page))
        .map(|clipped| clipped.area())
        .sum();

    (text_area / page_area * 100.0).clamp(0.0, 100.0)
}

/// A page looks scanned when one image covers most of it and there is
/// little text on top
pub fn is_likely_scanned(
    images: &[Rect],
    text_blocks: usize,
    page: &Rect,
    thresholds: &Thresholds,
) -> bool {
    let page_area = page.area();
    if page_area <= 0.0 {
        return false;
    }

    let has_full_page_image = images.iter().any(|image| {
        let covered = image.intersect(page).map(|r| r.area()).unwrap_or(0.0);
        covered / page_area > thresholds.scan_image_area_ratio
    });

    has_full_page_image && text_blocks < thresholds.scan_max_text_blocks
}
