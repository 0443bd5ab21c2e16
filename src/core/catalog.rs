//! Package index access and local package installation

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{AvailablePackage, InstalledPackage, LanguagePair};

/// File each installed package directory must carry
const METADATA_FILE: &str = "metadata.json";

/// Access to the remote package index and the local installed-package registry
#[async_trait]
pub trait PackageProvider: Send + Sync {
    /// List packages currently installed on disk
    async fn installed_packages(&self) -> Result<Vec<InstalledPackage>>;

    /// Fetch the remote index and cache it
    async fn update_index(&self) -> Result<()>;

    /// Packages listed by the remote index, fetching it on first use
    async fn available_packages(&self) -> Result<Vec<AvailablePackage>>;

    /// Download a package archive and install it locally
    async fn download_and_install(&self, package: &AvailablePackage) -> Result<InstalledPackage>;
}

/// Package manager backed by the argospm index and a local package directory
#[derive(Debug)]
pub struct ArgosPackageManager {
    client: reqwest::Client,
    index_url: String,
    packages_dir: PathBuf,
    index: RwLock<Option<Vec<AvailablePackage>>>,
}

impl ArgosPackageManager {
    /// Create a manager for the configured package directory
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.download_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        std::fs::create_dir_all(&config.packages_dir)?;

        Ok(Self {
            client,
            index_url: config.index_url.clone(),
            packages_dir: config.packages_dir.clone(),
            index: RwLock::new(None),
        })
    }

    /// Directory packages are installed into
    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    /// Extract a downloaded archive into the package directory
    fn install_archive(archive_path: &Path, dest: &Path) -> Result<()> {
        let file = std::fs::File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(dest)?;
        Ok(())
    }

    /// Parse one package directory, returning None for entries without metadata
    fn read_package_dir(dir: &Path) -> Option<InstalledPackage> {
        let metadata_path = dir.join(METADATA_FILE);
        let content = std::fs::read_to_string(&metadata_path).ok()?;

        match serde_json::from_str::<InstalledPackage>(&content) {
            Ok(mut package) => {
                package.path = dir.to_path_buf();
                Some(package)
            }
            Err(e) => {
                warn!("Skipping package dir {}: bad metadata: {}", dir.display(), e);
                None
            }
        }
    }
}

#[async_trait]
impl PackageProvider for ArgosPackageManager {
    async fn installed_packages(&self) -> Result<Vec<InstalledPackage>> {
        let mut packages = Vec::new();

        for entry in std::fs::read_dir(&self.packages_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(package) = Self::read_package_dir(&entry.path()) {
                    packages.push(package);
                }
            }
        }

        Ok(packages)
    }

    async fn update_index(&self) -> Result<()> {
        debug!("Refreshing package index from {}", self.index_url);

        let packages: Vec<AvailablePackage> = self
            .client
            .get(&self.index_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!("Package index refreshed: {} packages available", packages.len());
        *self.index.write().await = Some(packages);

        Ok(())
    }

    async fn available_packages(&self) -> Result<Vec<AvailablePackage>> {
        {
            let index = self.index.read().await;
            if let Some(packages) = index.as_ref() {
                return Ok(packages.clone());
            }
        }

        self.update_index().await?;

        let index = self.index.read().await;
        Ok(index.as_ref().cloned().unwrap_or_default())
    }

    async fn download_and_install(&self, package: &AvailablePackage) -> Result<InstalledPackage> {
        let pair = LanguagePair::new(&package.from_code, &package.to_code);

        let link = package
            .download_link()
            .ok_or_else(|| TranslationError::PackageUnavailable { pair: pair.clone() })?;

        info!("Downloading package {} from {}", pair, link);

        let bytes = self
            .client
            .get(link)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        // Write to a .part file first so a failed download never looks installed
        let archive_path = self
            .packages_dir
            .join(format!("{}.part", package.archive_name()));
        std::fs::write(&archive_path, &bytes)?;

        let dest = self.packages_dir.clone();
        let extract_src = archive_path.clone();
        tokio::task::spawn_blocking(move || Self::install_archive(&extract_src, &dest))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

        std::fs::remove_file(&archive_path)?;

        let installed = self.installed_packages().await?;
        installed
            .into_iter()
            .find(|p| p.matches(&pair))
            .ok_or_else(|| TranslationError::LanguageNotLoaded {
                pair,
                detail: "installed archive did not contain package metadata".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn manager_for(dir: &Path) -> ArgosPackageManager {
        let config = ServiceConfig {
            packages_dir: dir.to_path_buf(),
            ..Default::default()
        };
        ArgosPackageManager::new(&config).unwrap()
    }

    fn write_metadata(dir: &Path, from: &str, to: &str) {
        std::fs::create_dir_all(dir).unwrap();
        let metadata = serde_json::json!({
            "from_code": from,
            "to_code": to,
            "package_version": "1.0",
        });
        std::fs::write(dir.join(METADATA_FILE), metadata.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_installed_packages_scans_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        write_metadata(&tmp.path().join("translate-de_en-1_0"), "de", "en");
        write_metadata(&tmp.path().join("translate-en_de-1_0"), "en", "de");
        // a stray directory without metadata is ignored
        std::fs::create_dir_all(tmp.path().join("not-a-package")).unwrap();

        let manager = manager_for(tmp.path());
        let installed = manager.installed_packages().await.unwrap();

        assert_eq!(installed.len(), 2);
        assert!(installed.iter().any(|p| p.matches(&LanguagePair::new("de", "en"))));
        assert!(installed.iter().any(|p| p.matches(&LanguagePair::new("en", "de"))));
    }

    #[tokio::test]
    async fn test_install_archive_extracts_package() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager_for(tmp.path());

        // Build a minimal .argosmodel archive: one dir with metadata.json
        let archive_path = tmp.path().join("translate-de_en-1_0.argosmodel.part");
        let file = std::fs::File::create(&archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(
                "translate-de_en-1_0/metadata.json",
                zip::write::FileOptions::default(),
            )
            .unwrap();
        writer
            .write_all(br#"{"from_code": "de", "to_code": "en", "package_version": "1.0"}"#)
            .unwrap();
        writer.finish().unwrap();

        ArgosPackageManager::install_archive(&archive_path, tmp.path()).unwrap();

        let installed = manager.installed_packages().await.unwrap();
        assert_eq!(installed.len(), 1);
        assert!(installed[0].matches(&LanguagePair::new("de", "en")));
        assert!(installed[0].path.ends_with("translate-de_en-1_0"));
    }

    #[tokio::test]
    async fn test_download_rejects_package_without_links() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = manager_for(tmp.path());

        let package = AvailablePackage {
            from_code: "de".to_string(),
            to_code: "en".to_string(),
            package_version: "1.0".to_string(),
            from_name: String::new(),
            to_name: String::new(),
            links: vec![],
        };

        let err = manager.download_and_install(&package).await.unwrap_err();
        assert!(matches!(err, TranslationError::PackageUnavailable { .. }));
    }
}
