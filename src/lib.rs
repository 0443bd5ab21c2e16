//! Argos Bridge - HTTP bridge for offline German/English translation
//!
//! This library exposes a small HTTP API over the Argos Translate offline
//! model runtime, with lazy installation and caching of translation model
//! packages per language pair.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    catalog::{ArgosPackageManager, PackageProvider},
    config::ServiceConfig,
    engine::{ArgosCliEngine, TranslationEngine, TranslationModel},
    errors::TranslationError,
    models::{AvailablePackage, InstalledPackage, LanguagePair},
    service::TranslationService,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
