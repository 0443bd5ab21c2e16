//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Language codes the service accepts
pub const SUPPORTED_CODES: &[&str] = &["de", "en"];

/// Ordered (source, target) language pair identifying one translation direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Source language code
    pub from: String,
    /// Target language code
    pub to: String,
}

impl LanguagePair {
    /// Create a pair from raw codes, normalized to lowercase
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into().to_lowercase(),
            to: to.into().to_lowercase(),
        }
    }

    /// Check both codes against the supported set
    pub fn is_supported(&self) -> bool {
        SUPPORTED_CODES.contains(&self.from.as_str()) && SUPPORTED_CODES.contains(&self.to.as_str())
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Translation directions served by this deployment
pub fn supported_pairs() -> Vec<LanguagePair> {
    vec![LanguagePair::new("de", "en"), LanguagePair::new("en", "de")]
}

/// One entry of the remote package index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailablePackage {
    /// Source language code
    pub from_code: String,
    /// Target language code
    pub to_code: String,
    /// Package version string, e.g. "1.9"
    #[serde(default)]
    pub package_version: String,
    /// Human-readable source language name
    #[serde(default)]
    pub from_name: String,
    /// Human-readable target language name
    #[serde(default)]
    pub to_name: String,
    /// Download mirrors for the package archive
    #[serde(default)]
    pub links: Vec<String>,
}

impl AvailablePackage {
    /// Exact match against a language pair
    pub fn matches(&self, pair: &LanguagePair) -> bool {
        self.from_code == pair.from && self.to_code == pair.to
    }

    /// First usable download link, if the index entry has any
    pub fn download_link(&self) -> Option<&str> {
        self.links.first().map(|s| s.as_str())
    }

    /// Archive file name used while downloading
    pub fn archive_name(&self) -> String {
        format!(
            "translate-{}_{}-{}.argosmodel",
            self.from_code,
            self.to_code,
            self.package_version.replace('.', "_")
        )
    }
}

/// Metadata of a locally installed package plus its on-disk location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Source language code
    pub from_code: String,
    /// Target language code
    pub to_code: String,
    /// Package version string
    #[serde(default)]
    pub package_version: String,
    /// Directory the package was extracted into
    #[serde(skip)]
    pub path: PathBuf,
}

impl InstalledPackage {
    /// Exact match against a language pair
    pub fn matches(&self, pair: &LanguagePair) -> bool {
        self.from_code == pair.from && self.to_code == pair.to
    }
}
