//! Sample PDF fetcher
//!
//! Reads `manifest.yaml`, downloads redistributable samples into
//! `originals/<category>/<filename>`, and writes placeholder PDFs for
//! entries that must be produced by hand.

pub mod config;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod placeholder;

pub use config::FetchConfig;
pub use downloader::{Downloader, HttpDownloader, ProgressFn};
pub use error::{FetchError, FetchResult};
pub use fetcher::{
    builtin_url, write_manual_acquisition_note, FetchOutcome, FetchSummary, PlaceholderOutcome,
    SampleFetcher,
};
pub use manifest::{Manifest, ManifestEntry};
