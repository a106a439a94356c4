//! PDF structure analysis
//!
//! Inspects fonts, images, form fields and text layout of a PDF using lopdf
//! and guesses how the document was produced or translated.
//!
//! - [`analyze_file`] / [`StructureAnalyzer`]: single-document report
//! - [`compare_files`]: original vs. translated, reduced to scalar differences
//! - [`classify`]: the rendering-approach heuristic on aggregate counts

pub mod classify;
pub mod compare;
pub mod content;
pub mod error;
pub mod fonts;
pub mod forms;
pub mod geometry;
pub mod images;
pub mod metadata;
mod objects;
pub mod page;
mod resources;
pub mod report;
pub mod text;

pub use classify::{classify, DocumentStats, RenderingApproach, Thresholds};
pub use compare::{compare_files, ComparisonReport, Differences};
pub use error::AnalyzeError;
pub use page::{is_likely_scanned, text_coverage, PageAnalysis};
pub use report::{analyze_file, StructureAnalyzer, StructureReport};
