//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{supported_pairs, LanguagePair, SUPPORTED_CODES};

/// Default remote package index (argospm)
const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/argosopentech/argospm-index/main/index.json";

/// Configuration for the translation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Source language used when a request omits `from`
    pub default_from: String,
    /// Target language used when a request omits `to`
    pub default_to: String,
    /// Directory translation packages are installed into
    pub packages_dir: PathBuf,
    /// URL of the remote package index
    pub index_url: String,
    /// Translation runtime binary invoked per request
    pub argos_binary: String,
    /// Timeout for index and package downloads
    pub download_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_from: "de".to_string(),
            default_to: "en".to_string(),
            packages_dir: PathBuf::from("./packages"),
            index_url: DEFAULT_INDEX_URL.to_string(),
            argos_binary: "argos-translate".to_string(),
            download_timeout_ms: 120_000,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let default_from = std::env::var("DEFAULT_FROM_LANG")
            .unwrap_or_else(|_| "de".to_string())
            .to_lowercase();

        let default_to = std::env::var("DEFAULT_TO_LANG")
            .unwrap_or_else(|_| "en".to_string())
            .to_lowercase();

        let packages_dir = std::env::var("ARGOS_PACKAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./packages"));

        let index_url = std::env::var("ARGOS_PACKAGE_INDEX_URL")
            .unwrap_or_else(|_| DEFAULT_INDEX_URL.to_string());

        let argos_binary =
            std::env::var("ARGOS_BINARY").unwrap_or_else(|_| "argos-translate".to_string());

        let download_timeout_ms = std::env::var("DOWNLOAD_TIMEOUT_MS")
            .unwrap_or_else(|_| "120000".to_string())
            .parse::<u64>()
            .map_err(|e| TranslationError::ConfigError {
                message: format!("DOWNLOAD_TIMEOUT_MS must be a number: {}", e),
            })?;

        Ok(Self {
            default_from,
            default_to,
            packages_dir,
            index_url,
            argos_binary,
            download_timeout_ms,
        })
    }

    /// Load and validate configuration
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for code in [&self.default_from, &self.default_to] {
            if !SUPPORTED_CODES.contains(&code.as_str()) {
                return Err(TranslationError::ConfigError {
                    message: format!(
                        "Default language '{}' is not in the supported set {:?}",
                        code, SUPPORTED_CODES
                    ),
                });
            }
        }

        if self.index_url.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "Package index URL is required".to_string(),
            });
        }

        if self.argos_binary.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "Translation runtime binary is required".to_string(),
            });
        }

        if self.download_timeout_ms == 0 {
            return Err(TranslationError::ConfigError {
                message: "download_timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Pair used when a request omits both language codes
    pub fn default_pair(&self) -> LanguagePair {
        LanguagePair::new(&self.default_from, &self.default_to)
    }

    /// Fixed allowlist of translation directions
    pub fn supported_pairs(&self) -> Vec<LanguagePair> {
        supported_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_pair(), LanguagePair::new("de", "en"));
    }

    #[test]
    fn test_validation_rejects_unsupported_default() {
        let config = ServiceConfig {
            default_from: "fr".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_index_url() {
        let config = ServiceConfig {
            index_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = ServiceConfig {
            download_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
