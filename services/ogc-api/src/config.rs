//! CLI arguments and catalog loading.

use anyhow::{Context, Result};
use clap::Parser;
use ogc_protocol::ServiceCatalog;
use std::path::{Path, PathBuf};

/// OGC API Server
#[derive(Parser, Debug)]
#[command(name = "ogc-api")]
#[command(about = "OGC-style WMS/WFS protocol server")]
pub struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8084", env = "OGC_LISTEN_ADDR")]
    pub listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "OGC_LOG_JSON")]
    pub log_json: bool,

    /// Number of worker threads
    #[arg(long, env = "OGC_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Optional YAML catalog file overriding the built-in registry
    #[arg(long, env = "OGC_CATALOG_FILE")]
    pub catalog: Option<PathBuf>,

    /// Timeout for renderer/feature-source calls, in milliseconds
    #[arg(long, default_value = "5000", env = "OGC_COLLABORATOR_TIMEOUT_MS")]
    pub collaborator_timeout_ms: u64,
}

/// Load the service catalog, falling back to the built-in registry when no
/// file is configured.
pub fn load_catalog(path: Option<&Path>) -> Result<ServiceCatalog> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
            let catalog: ServiceCatalog = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse catalog file: {:?}", path))?;
            tracing::info!(
                layers = catalog.layers.len(),
                feature_types = catalog.feature_types.len(),
                "Loaded catalog from {:?}",
                path
            );
            Ok(catalog)
        }
        None => Ok(ServiceCatalog::builtin()),
    }
}
