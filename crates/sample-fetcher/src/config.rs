//! Fetcher configuration
//!
//! Defaults match the layout of the samples tree (`samples/manifest.yaml`,
//! `samples/originals/`). Any field can be overridden from a TOML file.

use crate::error::{FetchError, FetchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (PDF Sample Fetcher for Testing)";

/// Licenses whose samples may be downloaded automatically
pub const REDISTRIBUTABLE_LICENSES: &[&str] = &[
    "public-domain",
    "cc-by",
    "cc-by-sa",
    "cc0",
    "mit",
    "apache-2.0",
    "bsd",
];

/// Accepted in addition to the allow-list
pub const ARXIV_LICENSE: &str = "arxiv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Root of the samples tree
    pub samples_dir: PathBuf,
    /// Manifest location (default: `<samples_dir>/manifest.yaml`)
    pub manifest: Option<PathBuf>,
    /// Download root (default: `<samples_dir>/originals`)
    pub originals_dir: Option<PathBuf>,
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Read buffer size when streaming a response body
    pub chunk_size: usize,
    pub redistributable_licenses: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            samples_dir: PathBuf::from("samples"),
            manifest: None,
            originals_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            chunk_size: 8192,
            redistributable_licenses: REDISTRIBUTABLE_LICENSES
                .iter()
                .map(|license| license.to_string())
                .collect(),
        }
    }
}

impl FromStr for FetchConfig {
    type Err = FetchError;

    fn from_str(s: &str) -> FetchResult<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl FetchConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> FetchResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FetchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Point the configuration at another samples tree
    pub fn with_samples_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.samples_dir = dir.into();
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.samples_dir.join("manifest.yaml"))
    }

    pub fn originals_dir(&self) -> PathBuf {
        self.originals_dir
            .clone()
            .unwrap_or_else(|| self.samples_dir.join("originals"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `license` must already be lower-cased
    pub fn is_fetchable_license(&self, license: &str) -> bool {
        license == ARXIV_LICENSE
            || self
                .redistributable_licenses
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(license))
    }
}
