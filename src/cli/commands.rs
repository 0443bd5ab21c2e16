//! CLI command definitions and handlers

use clap::Subcommand;

/// Commands for the translation bridge
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP translation server
    Serve {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 5000)
        #[arg(short, long, default_value_t = 5000)]
        port: u16,

        /// Skip model pre-loading at startup
        #[arg(long)]
        skip_preload: bool,
    },

    /// Install and load all supported translation models, then exit
    Preload,

    /// List locally installed translation packages
    Packages,
}

/// Handle server command
pub async fn handle_serve(host: String, port: u16, skip_preload: bool) -> anyhow::Result<()> {
    use crate::core::config::ServiceConfig;
    use crate::core::service::TranslationService;
    use crate::server::api::run_server;
    use std::sync::Arc;
    use tracing::info;

    let config = ServiceConfig::load()?;
    let service = Arc::new(TranslationService::from_config(config)?);

    if skip_preload {
        info!("Skipping model pre-load");
    } else {
        let total = service.config().supported_pairs().len();
        let loaded = service.preload_all().await;
        info!("Pre-loaded {}/{} models", loaded, total);
    }

    println!("🚀 Server starting on http://{}:{}", host, port);
    run_server(host, port, service).await?;

    Ok(())
}

/// Handle preload command
pub async fn handle_preload() -> anyhow::Result<()> {
    use crate::core::config::ServiceConfig;
    use crate::core::service::TranslationService;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;
    use tracing::info;

    let start_time = Instant::now();

    let config = ServiceConfig::load()?;
    info!("Package directory: {}", config.packages_dir.display());

    let service = TranslationService::from_config(config)?;
    let pairs = service.config().supported_pairs();

    // Create progress bar
    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("=>-"));

    let mut loaded = 0;
    let mut failed = 0;

    for pair in pairs {
        pb.set_message(format!("Loading: {}", pair));

        match service.ensure_loaded(&pair).await {
            Ok(_) => {
                loaded += 1;
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error loading {}: {}", pair, e);
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Completed");

    let duration = start_time.elapsed();
    info!("Completed: {} loaded, {} failed in {:?}", loaded, failed, duration);

    println!("\n✅ Pre-load completed!");
    println!("   Loaded: {}", loaded);
    println!("   Failed: {}", failed);
    println!("   Time: {:?}", duration);

    Ok(())
}

/// Handle packages command
pub async fn handle_packages() -> anyhow::Result<()> {
    use crate::core::catalog::{ArgosPackageManager, PackageProvider};
    use crate::core::config::ServiceConfig;

    let config = ServiceConfig::load()?;
    let manager = ArgosPackageManager::new(&config)?;
    let installed = manager.installed_packages().await?;

    if installed.is_empty() {
        println!(
            "No translation packages installed in {}",
            config.packages_dir.display()
        );
        return Ok(());
    }

    println!("Installed packages ({}):", installed.len());
    for package in installed {
        println!(
            "   {} -> {} (v{})  {}",
            package.from_code,
            package.to_code,
            package.package_version,
            package.path.display()
        );
    }

    Ok(())
}
