//! CLI command implementations.

pub mod build;
pub mod check;

use anyhow::{Context, Result};
use sitemeta_core::Config;
use std::path::Path;

/// Load the config file, falling back to defaults when it is absent.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))
    } else {
        tracing::info!("No config file at {:?}; using defaults", path);
        Ok(Config::default())
    }
}
