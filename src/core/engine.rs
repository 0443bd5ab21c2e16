//! Translation runtime seam and the Argos CLI implementation

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::LanguagePair;

/// A loaded translation capability for one fixed language pair
#[async_trait]
pub trait TranslationModel: Send + Sync + std::fmt::Debug {
    /// Translate input text, never panicking across this boundary
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Loads models from installed packages, actual inference happens elsewhere
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Produce an invocable model for the pair backed by `packages_dir`
    async fn load(
        &self,
        pair: &LanguagePair,
        packages_dir: &Path,
    ) -> Result<Arc<dyn TranslationModel>>;
}

/// Engine that shells out to the `argos-translate` runtime per call
#[derive(Debug, Clone)]
pub struct ArgosCliEngine {
    binary: String,
}

impl ArgosCliEngine {
    /// Create an engine invoking the given runtime binary
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl TranslationEngine for ArgosCliEngine {
    async fn load(
        &self,
        pair: &LanguagePair,
        packages_dir: &Path,
    ) -> Result<Arc<dyn TranslationModel>> {
        // Probe the runtime once per pair so a missing binary fails at load
        // time, not on the first live request
        let probe = Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match probe {
            Ok(status) if status.success() => {}
            Ok(status) => {
                return Err(TranslationError::LanguageNotLoaded {
                    pair: pair.clone(),
                    detail: format!("runtime probe exited with {}", status),
                });
            }
            Err(e) => {
                return Err(TranslationError::LanguageNotLoaded {
                    pair: pair.clone(),
                    detail: format!("runtime '{}' unavailable: {}", self.binary, e),
                });
            }
        }

        debug!("Loaded CLI model for {}", pair);

        Ok(Arc::new(ArgosCliModel {
            binary: self.binary.clone(),
            packages_dir: packages_dir.to_path_buf(),
            pair: pair.clone(),
        }))
    }
}

/// One pair's model, invoked as a subprocess per translation
#[derive(Debug)]
struct ArgosCliModel {
    binary: String,
    packages_dir: PathBuf,
    pair: LanguagePair,
}

impl ArgosCliModel {
    async fn run(&self, text: &str) -> std::io::Result<std::process::Output> {
        let mut child = Command::new(&self.binary)
            .arg("--from-lang")
            .arg(&self.pair.from)
            .arg("--to-lang")
            .arg(&self.pair.to)
            .env("ARGOS_PACKAGES_DIR", &self.packages_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        child.wait_with_output().await
    }
}

#[async_trait]
impl TranslationModel for ArgosCliModel {
    async fn translate(&self, text: &str) -> Result<String> {
        let output = self
            .run(text)
            .await
            .map_err(|e| TranslationError::ModelInvocationFailure {
                detail: format!("failed to invoke runtime for {}: {}", self.pair, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranslationError::ModelInvocationFailure {
                detail: format!(
                    "runtime exited with {} for {}: {}",
                    output.status,
                    self.pair,
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_fails_for_missing_binary() {
        let engine = ArgosCliEngine::new("definitely-not-a-real-binary");
        let err = engine
            .load(&LanguagePair::new("de", "en"), Path::new("./packages"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::LanguageNotLoaded { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cli_model_pipes_text_through_runtime() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        // Stand-in runtime: ignores flags, echoes stdin back
        let tmp = tempfile::tempdir().unwrap();
        let script_path = tmp.path().join("fake-argos");
        {
            let mut script = std::fs::File::create(&script_path).unwrap();
            script.write_all(b"#!/bin/sh\ncat -\n").unwrap();
        }
        let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script_path, perms).unwrap();

        let model = ArgosCliModel {
            binary: script_path.to_string_lossy().to_string(),
            packages_dir: tmp.path().to_path_buf(),
            pair: LanguagePair::new("de", "en"),
        };

        let result = model.translate("Hallo Welt").await.unwrap();
        assert_eq!(result, "Hallo Welt");
    }

    #[tokio::test]
    async fn test_invocation_failure_is_typed() {
        let model = ArgosCliModel {
            binary: "definitely-not-a-real-binary".to_string(),
            packages_dir: PathBuf::from("./packages"),
            pair: LanguagePair::new("en", "de"),
        };

        let err = model.translate("hello").await.unwrap_err();
        assert!(matches!(err, TranslationError::ModelInvocationFailure { .. }));
    }
}
