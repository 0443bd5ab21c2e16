//! Custom error types for translation operations

use thiserror::Error;

use crate::core::models::LanguagePair;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Required request field is missing
    #[error("Missing '{field}' field in request body")]
    MissingField {
        field: String,
    },

    /// Language code outside the supported set
    #[error("Only German ('de') and English ('en') translation is supported.")]
    UnsupportedLanguage {
        code: String,
    },

    /// No package for the pair exists in the remote index
    #[error("Translation package for {pair} is not available in the package index")]
    PackageUnavailable {
        pair: LanguagePair,
    },

    /// Package installed but the runtime cannot serve the pair
    #[error("Model not available for {pair}: {detail}")]
    LanguageNotLoaded {
        pair: LanguagePair,
        detail: String,
    },

    /// Loaded model failed while translating
    #[error("Translation failed: {detail}")]
    ModelInvocationFailure {
        detail: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Package archive error
    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),
}

impl TranslationError {
    /// Whether this error is caused by bad client input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TranslationError::MissingField { .. } | TranslationError::UnsupportedLanguage { .. }
        )
    }

    /// Whether this error means the backing model or package is unavailable
    pub fn is_service_unavailable(&self) -> bool {
        matches!(
            self,
            TranslationError::PackageUnavailable { .. }
                | TranslationError::LanguageNotLoaded { .. }
                | TranslationError::ModelInvocationFailure { .. }
                | TranslationError::IoError(_)
                | TranslationError::HttpError(_)
                | TranslationError::JsonError(_)
                | TranslationError::ArchiveError(_)
        )
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
