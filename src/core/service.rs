//! Translation service with model caching and lazy install fallback

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::core::catalog::{ArgosPackageManager, PackageProvider};
use crate::core::config::ServiceConfig;
use crate::core::engine::{ArgosCliEngine, TranslationEngine, TranslationModel};
use crate::core::errors::{Result, TranslationError};
use crate::core::models::LanguagePair;

/// Process-wide translation service
///
/// Owns the model cache mapping a [`LanguagePair`] to its loaded model.
/// Models are installed and loaded eagerly by [`preload_all`](Self::preload_all)
/// at startup and lazily on the first request that misses the cache. Load
/// failures are returned, never cached, so every later request retries the
/// install path.
pub struct TranslationService {
    config: Arc<ServiceConfig>,
    provider: Arc<dyn PackageProvider>,
    engine: Arc<dyn TranslationEngine>,
    models: RwLock<HashMap<LanguagePair, Arc<dyn TranslationModel>>>,
    // One lock per pair: install+load runs single-flight, concurrent first
    // requests for the same pair wait for the in-flight load
    load_locks: Mutex<HashMap<LanguagePair, Arc<Mutex<()>>>>,
}

impl TranslationService {
    /// Create a service over explicit provider and engine implementations
    pub fn new(
        config: ServiceConfig,
        provider: Arc<dyn PackageProvider>,
        engine: Arc<dyn TranslationEngine>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            engine,
            models: RwLock::new(HashMap::new()),
            load_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create the production wiring: argospm packages plus the CLI runtime
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let provider = Arc::new(ArgosPackageManager::new(&config)?);
        let engine = Arc::new(ArgosCliEngine::new(config.argos_binary.clone()));
        Ok(Self::new(config, provider, engine))
    }

    /// Service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Whether the pair is in the fixed supported set
    pub fn is_supported(&self, pair: &LanguagePair) -> bool {
        pair.is_supported()
    }

    /// Install and load models for every supported pair
    ///
    /// Called once at startup. A failure for one pair is logged and swallowed,
    /// leaving that pair to the lazy fallback on its first request. Returns
    /// the number of pairs loaded.
    pub async fn preload_all(&self) -> usize {
        if let Err(e) = self.provider.update_index().await {
            warn!("Failed to refresh package index: {}", e);
        }

        let mut loaded = 0;
        for pair in self.config.supported_pairs() {
            match self.ensure_loaded(&pair).await {
                Ok(_) => {
                    info!("Pre-loaded model for {}", pair);
                    loaded += 1;
                }
                Err(e) => {
                    warn!(
                        "Pre-load failed for {} (will retry on first request): {}",
                        pair, e
                    );
                }
            }
        }

        loaded
    }

    /// Return the cached model for the pair, installing and loading it first
    /// if this is the pair's first use
    pub async fn ensure_loaded(&self, pair: &LanguagePair) -> Result<Arc<dyn TranslationModel>> {
        if let Some(model) = self.models.read().await.get(pair) {
            return Ok(model.clone());
        }

        let lock = self.load_lock(pair).await;
        let _guard = lock.lock().await;

        // Another request may have finished the load while we waited
        if let Some(model) = self.models.read().await.get(pair) {
            return Ok(model.clone());
        }

        self.install_if_needed(pair).await?;

        let model = self.engine.load(pair, &self.config.packages_dir).await?;
        self.models
            .write()
            .await
            .insert(pair.clone(), model.clone());

        debug!("Model cached for {}", pair);
        Ok(model)
    }

    /// Translate text between the given language codes
    pub async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let pair = LanguagePair::new(from, to);
        let model = self.ensure_loaded(&pair).await?;

        model.translate(text).await.map_err(|e| match e {
            invocation @ TranslationError::ModelInvocationFailure { .. } => invocation,
            other => TranslationError::ModelInvocationFailure {
                detail: other.to_string(),
            },
        })
    }

    /// Install the pair's package unless an exact match is already on disk
    ///
    /// Returns true when a download actually happened.
    async fn install_if_needed(&self, pair: &LanguagePair) -> Result<bool> {
        let installed = self.provider.installed_packages().await?;
        if installed.iter().any(|p| p.matches(pair)) {
            return Ok(false);
        }

        self.provider.update_index().await?;
        let available = self.provider.available_packages().await?;

        match available.iter().find(|p| p.matches(pair)) {
            Some(package) => {
                info!("Installing package for {}", pair);
                self.provider.download_and_install(package).await?;
                Ok(true)
            }
            None => Err(TranslationError::PackageUnavailable { pair: pair.clone() }),
        }
    }

    /// Fetch or create the pair's load lock
    async fn load_lock(&self, pair: &LanguagePair) -> Arc<Mutex<()>> {
        let mut locks = self.load_locks.lock().await;
        locks.entry(pair.clone()).or_default().clone()
    }
}
