//! Test doubles for the package-provider and engine seams

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::catalog::PackageProvider;
use crate::core::engine::{TranslationEngine, TranslationModel};
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{AvailablePackage, InstalledPackage, LanguagePair};

/// In-memory package provider with call counters
#[derive(Default)]
pub struct MockProvider {
    /// Packages the fake remote index offers
    pub available: Vec<AvailablePackage>,
    /// Packages "on disk"
    pub installed: Mutex<Vec<InstalledPackage>>,
    /// Number of download_and_install calls
    pub install_calls: AtomicUsize,
    /// Number of update_index calls
    pub index_calls: AtomicUsize,
    /// When set, download_and_install fails
    pub fail_install: AtomicBool,
    install_delay: Duration,
}

impl MockProvider {
    /// Provider whose index offers exactly these directions
    pub fn with_codes(codes: &[(&str, &str)]) -> Self {
        let available = codes
            .iter()
            .map(|(from, to)| AvailablePackage {
                from_code: from.to_string(),
                to_code: to.to_string(),
                package_version: "1.0".to_string(),
                from_name: String::new(),
                to_name: String::new(),
                links: vec![format!("https://example.com/{}_{}.argosmodel", from, to)],
            })
            .collect();

        Self {
            available,
            ..Default::default()
        }
    }

    /// Provider with an empty remote index
    pub fn empty() -> Self {
        Self::default()
    }

    /// Make installs take a while, for racing concurrent loads in tests
    pub fn with_install_delay(mut self, millis: u64) -> Self {
        self.install_delay = Duration::from_millis(millis);
        self
    }
}

#[async_trait]
impl PackageProvider for MockProvider {
    async fn installed_packages(&self) -> Result<Vec<InstalledPackage>> {
        Ok(self.installed.lock().unwrap().clone())
    }

    async fn update_index(&self) -> Result<()> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn available_packages(&self) -> Result<Vec<AvailablePackage>> {
        Ok(self.available.clone())
    }

    async fn download_and_install(&self, package: &AvailablePackage) -> Result<InstalledPackage> {
        self.install_calls.fetch_add(1, Ordering::SeqCst);

        if !self.install_delay.is_zero() {
            tokio::time::sleep(self.install_delay).await;
        }

        let pair = LanguagePair::new(&package.from_code, &package.to_code);
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(TranslationError::LanguageNotLoaded {
                pair,
                detail: "simulated install failure".to_string(),
            });
        }

        let installed = InstalledPackage {
            from_code: package.from_code.clone(),
            to_code: package.to_code.clone(),
            package_version: package.package_version.clone(),
            path: PathBuf::from(format!("/tmp/{}_{}", package.from_code, package.to_code)),
        };
        self.installed.lock().unwrap().push(installed.clone());

        Ok(installed)
    }
}

/// Engine handing out canned models
#[derive(Default)]
pub struct MockEngine {
    /// Number of load calls
    pub load_calls: AtomicUsize,
    fail_translate: bool,
}

impl MockEngine {
    /// Engine whose models fail on every invocation
    pub fn failing_translate() -> Self {
        Self {
            fail_translate: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl TranslationEngine for MockEngine {
    async fn load(
        &self,
        pair: &LanguagePair,
        _packages_dir: &Path,
    ) -> Result<Arc<dyn TranslationModel>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockModel {
            pair: pair.clone(),
            fail: self.fail_translate,
        }))
    }
}

/// Model with a two-word dictionary, enough for handler and service tests
#[derive(Debug)]
pub struct MockModel {
    pair: LanguagePair,
    fail: bool,
}

#[async_trait]
impl TranslationModel for MockModel {
    async fn translate(&self, text: &str) -> Result<String> {
        if self.fail {
            return Err(TranslationError::ModelInvocationFailure {
                detail: "simulated model failure".to_string(),
            });
        }

        let translated = match (self.pair.from.as_str(), self.pair.to.as_str(), text) {
            ("de", "en", "Hallo") => "Hello".to_string(),
            ("en", "de", "Hello") => "Hallo".to_string(),
            _ => format!("{} [{}]", text, self.pair.to),
        };

        Ok(translated)
    }
}
