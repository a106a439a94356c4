//! Manifest-driven fetch loop

use crate::config::FetchConfig;
use crate::downloader::{Downloader, HttpDownloader};
use crate::error::FetchResult;
use crate::manifest::{Manifest, ManifestEntry};
use crate::placeholder::sample_placeholder;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Known-redistributable sources for samples whose manifest entry has no URL
pub const BUILTIN_URLS: &[(&str, &str)] = &[
    ("irs-1040", "https://www.irs.gov/pub/irs-pdf/f1040.pdf"),
    ("irs-w9", "https://www.irs.gov/pub/irs-pdf/fw9.pdf"),
    ("bitcoin-whitepaper", "https://bitcoin.org/bitcoin.pdf"),
];

/// Printed after every batch
pub const MANUAL_ACQUISITION_NOTE: &[&str] = &[
    "Scanned documents (scan a physical menu, brochure, etc.)",
    "Generated samples (use Word/Google Docs to create)",
    "Synthetic data (bank statements, invoices)",
    "Samples with unclear licensing (download manually)",
];

pub fn builtin_url(id: &str) -> Option<&'static str> {
    BUILTIN_URLS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, url)| *url)
}

/// What happened to one manifest entry
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Destination already on disk; nothing downloaded
    AlreadyPresent(PathBuf),
    Downloaded {
        path: PathBuf,
        bytes: u64,
        sha256: String,
    },
    /// `generated`, `synthetic` or `scan` source
    ManualCreation { source: String },
    NoUrl,
    LicenseRestricted { license: String, url: String },
    Failed { url: String, error: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::AlreadyPresent(_) | Self::Downloaded { .. })
    }
}

/// Outcome counts for a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub manual_creation: usize,
    pub no_url: usize,
    pub license_restricted: usize,
    pub failed: usize,
}

impl FetchSummary {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::AlreadyPresent(_) => self.already_present += 1,
            FetchOutcome::Downloaded { .. } => self.downloaded += 1,
            FetchOutcome::ManualCreation { .. } => self.manual_creation += 1,
            FetchOutcome::NoUrl => self.no_url += 1,
            FetchOutcome::LicenseRestricted { .. } => self.license_restricted += 1,
            FetchOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.downloaded
            + self.already_present
            + self.manual_creation
            + self.no_url
            + self.license_restricted
            + self.failed
    }
}

/// Result of a manifest placeholder request
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderOutcome {
    NotInManifest,
    AlreadyExists(PathBuf),
    Generated(PathBuf),
}

pub struct SampleFetcher<D> {
    config: FetchConfig,
    manifest: Manifest,
    downloader: D,
}

impl SampleFetcher<HttpDownloader> {
    /// Load the configured manifest and build an HTTP client
    pub fn from_config(config: FetchConfig) -> FetchResult<Self> {
        let manifest = Manifest::load(config.manifest_path())?;
        let downloader = HttpDownloader::new(&config)?;
        Ok(Self::new(config, manifest, downloader))
    }
}

impl<D: Downloader> SampleFetcher<D> {
    pub fn new(config: FetchConfig, manifest: Manifest, downloader: D) -> Self {
        Self {
            config,
            manifest,
            downloader,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    /// Process every manifest entry, or only those named in `ids`.
    ///
    /// Per-entry failures are reported to `out` and counted; only console
    /// write errors abort the batch.
    pub fn fetch_all<W: Write>(&self, ids: &[String], out: &mut W) -> FetchResult<FetchSummary> {
        let mut summary = FetchSummary::default();

        for (id, entry) in self.manifest.entries() {
            if !ids.is_empty() && !ids.iter().any(|wanted| wanted == id) {
                continue;
            }

            writeln!(out, "\nProcessing: {}", id)?;
            let outcome = self.fetch_sample(id, entry, out)?;
            match &outcome {
                FetchOutcome::ManualCreation { .. } => {}
                outcome if outcome.is_success() => writeln!(out, "  Successfully fetched: {}", id)?,
                _ => writeln!(out, "  Could not fetch: {}", id)?,
            }
            debug!(id, ?outcome, "Sample processed");
            summary.record(&outcome);
        }

        info!(
            processed = summary.processed(),
            downloaded = summary.downloaded,
            failed = summary.failed,
            "Fetch complete"
        );
        Ok(summary)
    }

    /// Fetch one entry. The destination is checked before any network access,
    /// so repeated runs never download the same sample twice.
    pub fn fetch_sample<W: Write>(
        &self,
        id: &str,
        entry: &ManifestEntry,
        out: &mut W,
    ) -> FetchResult<FetchOutcome> {
        if let Some(source) = entry.manual_source() {
            writeln!(out, "  Skipping - requires manual creation (source: {})", source)?;
            return Ok(FetchOutcome::ManualCreation {
                source: source.to_string(),
            });
        }

        let dest = entry.destination(&self.config.originals_dir(), id);
        if dest.exists() {
            writeln!(out, "  File already exists: {}", dest.display())?;
            return Ok(FetchOutcome::AlreadyPresent(dest));
        }

        let Some(url) = entry.source_url().or_else(|| builtin_url(id)) else {
            writeln!(out, "  No URL available for automatic download")?;
            return Ok(FetchOutcome::NoUrl);
        };

        let license = entry.license.to_lowercase();
        if !self.config.is_fetchable_license(&license) {
            writeln!(
                out,
                "  Skipping due to unclear redistribution rights (license: {})",
                license
            )?;
            writeln!(out, "  Please download manually from: {}", url)?;
            return Ok(FetchOutcome::LicenseRestricted {
                license,
                url: url.to_string(),
            });
        }

        writeln!(out, "  Downloading from: {}", url)?;
        match self.download_to(url, &dest, out) {
            Ok((bytes, sha256)) => {
                info!(id, bytes, %sha256, path = %dest.display(), "Sample downloaded");
                Ok(FetchOutcome::Downloaded {
                    path: dest,
                    bytes,
                    sha256,
                })
            }
            Err(e) => {
                writeln!(out, "  Error downloading: {}", e)?;
                warn!(id, url, error = %e, "Download failed");
                Ok(FetchOutcome::Failed {
                    url: url.to_string(),
                    error: e.to_string(),
                })
            }
        }
    }

    /// Stream into `<dest>.part` and rename into place once complete
    fn download_to<W: Write>(
        &self,
        url: &str,
        dest: &Path,
        out: &mut W,
    ) -> FetchResult<(u64, String)> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let partial = partial_path(dest);

        let mut progress_shown = false;
        let mut progress = |downloaded: u64, total: Option<u64>| -> io::Result<()> {
            if let Some(total) = total {
                let percent = downloaded as f64 / total as f64 * 100.0;
                write!(out, "\r  Progress: {:.1}%", percent)?;
                out.flush()?;
                progress_shown = true;
            }
            Ok(())
        };
        let result = self.downloader.download(url, &partial, &mut progress);

        if result.is_ok() || progress_shown {
            writeln!(out)?;
        }

        let renamed = result.and_then(|bytes| {
            fs::rename(&partial, dest)?;
            Ok(bytes)
        });
        let bytes = match renamed {
            Ok(bytes) => bytes,
            Err(e) => {
                discard_partial(&partial);
                return Err(e);
            }
        };

        Ok((bytes, file_sha256(dest)?))
    }

    /// Write a stand-in PDF at the entry's destination
    pub fn generate_placeholder<W: Write>(
        &self,
        id: &str,
        out: &mut W,
    ) -> FetchResult<PlaceholderOutcome> {
        let Some(entry) = self.manifest.find(id) else {
            writeln!(out, "Sample {} not found in manifest", id)?;
            return Ok(PlaceholderOutcome::NotInManifest);
        };

        let dest = entry.destination(&self.config.originals_dir(), id);
        if dest.exists() {
            writeln!(out, "File already exists: {}", dest.display())?;
            return Ok(PlaceholderOutcome::AlreadyExists(dest));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        sample_placeholder(id, &entry.category).save(&dest)?;
        writeln!(out, "Generated placeholder: {}", dest.display())?;
        info!(id, path = %dest.display(), "Placeholder generated");
        Ok(PlaceholderOutcome::Generated(dest))
    }
}

/// Closing note listing the samples that cannot be fetched automatically
pub fn write_manual_acquisition_note<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nNote: Some samples require manual creation or acquisition:")?;
    for line in MANUAL_ACQUISITION_NOTE {
        writeln!(out, "- {}", line)?;
    }
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn discard_partial(partial: &Path) {
    if partial.exists() {
        if let Err(e) = fs::remove_file(partial) {
            warn!(path = %partial.display(), error = %e, "Could not remove partial download");
        }
    }
}

/// Hex SHA-256 of a file's contents
pub fn file_sha256(path: &Path) -> FetchResult<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 4096];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_urls() {
        assert_eq!(builtin_url("bitcoin-whitepaper"), Some("https://bitcoin.org/bitcoin.pdf"));
        assert_eq!(builtin_url("irs-w9"), Some("https://www.irs.gov/pub/irs-pdf/fw9.pdf"));
        assert_eq!(builtin_url("unknown"), None);
    }

    #[test]
    fn test_partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("originals/forms/fw9.pdf")),
            PathBuf::from("originals/forms/fw9.pdf.part")
        );
    }

    #[test]
    fn test_sha256_of_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(
            file_sha256(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = FetchSummary::default();
        summary.record(&FetchOutcome::NoUrl);
        summary.record(&FetchOutcome::AlreadyPresent(PathBuf::from("a.pdf")));
        summary.record(&FetchOutcome::Failed {
            url: "http://x".into(),
            error: "boom".into(),
        });
        assert_eq!(summary.processed(), 3);
        assert_eq!(summary.no_url, 1);
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_manual_note_lines() {
        let mut out = Vec::new();
        write_manual_acquisition_note(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\nNote: Some samples require manual creation or acquisition:\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 4);
    }
}
