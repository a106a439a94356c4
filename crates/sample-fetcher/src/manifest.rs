//! Sample manifest (`manifest.yaml`)

use crate::error::{FetchError, FetchResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Sources that cannot be downloaded and must be produced by hand
pub const MANUAL_SOURCES: &[&str] = &["generated", "synthetic", "scan"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub samples: Vec<ManifestEntry>,
}

/// One sample record. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManifestEntry {
    pub id: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    pub filename: Option<String>,
    pub source_url: Option<String>,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub source: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(path: P) -> FetchResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FetchError::ManifestNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let manifest: Manifest =
            serde_yaml::from_str(&content).map_err(|source| FetchError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            "Loaded {} manifest entries from {}",
            manifest.samples.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Entries that carry an id, in manifest order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.samples
            .iter()
            .filter_map(|entry| entry.id.as_deref().map(|id| (id, entry)))
    }

    pub fn find(&self, id: &str) -> Option<&ManifestEntry> {
        self.entries()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, entry)| entry)
    }
}

impl ManifestEntry {
    /// `filename`, or `<id>.pdf`
    pub fn filename(&self, id: &str) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("{}.pdf", id))
    }

    /// `<originals>/<category>/<filename>`
    pub fn destination(&self, originals_dir: &Path, id: &str) -> PathBuf {
        originals_dir.join(&self.category).join(self.filename(id))
    }

    /// The source kind when this sample must be created by hand
    pub fn manual_source(&self) -> Option<&str> {
        MANUAL_SOURCES
            .contains(&self.source.as_str())
            .then_some(self.source.as_str())
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MANIFEST: &str = r#"
samples:
  - id: irs-w9
    category: forms
    source_url: https://www.irs.gov/pub/irs-pdf/fw9.pdf
    license: public-domain
    description: Request for Taxpayer Identification Number
  - id: cafe-menu
    category: scanned
    source: scan
  - description: entry without an id
  - id: bare
"#;

    fn manifest() -> Manifest {
        serde_yaml::from_str(MANIFEST).unwrap()
    }

    #[test]
    fn test_entries_skip_missing_ids() {
        let manifest = manifest();
        let ids: Vec<&str> = manifest.entries().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["irs-w9", "cafe-menu", "bare"]);
    }

    #[test]
    fn test_entry_defaults() {
        let manifest = manifest();
        let entry = manifest.find("bare").unwrap();
        assert_eq!(entry.category, "uncategorized");
        assert_eq!(entry.filename("bare"), "bare.pdf");
        assert_eq!(entry.license, "");
        assert_eq!(entry.source_url(), None);
        assert_eq!(
            entry.destination(Path::new("originals"), "bare"),
            PathBuf::from("originals/uncategorized/bare.pdf")
        );
    }

    #[test]
    fn test_manual_source() {
        let manifest = manifest();
        assert_eq!(manifest.find("cafe-menu").unwrap().manual_source(), Some("scan"));
        assert_eq!(manifest.find("irs-w9").unwrap().manual_source(), None);
    }

    #[test]
    fn test_find_unknown_id() {
        assert!(manifest().find("nope").is_none());
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yaml");
        let err = Manifest::load(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Manifest file not found at {}", path.display())
        );
    }

    #[test]
    fn test_load_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yaml");
        fs::write(&path, "samples: [unterminated").unwrap();
        assert!(matches!(
            Manifest::load(&path),
            Err(FetchError::ManifestParse { .. })
        ));
    }
}
