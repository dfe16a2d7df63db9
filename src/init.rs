//! Project initialization.
//!
//! Writes a default `texmill.toml` and creates the documents root together
//! with its common directory.

use crate::{config::ProjectConfig, log};
use anyhow::{Context, Result, bail};
use std::fs;

/// Initialize a project at the configured root.
///
/// Refuses to run when the config file already exists. Existing directories
/// are left as they are.
pub fn new_project(config: &ProjectConfig) -> Result<()> {
    if config.config_path.exists() {
        bail!(
            "Config file `{}` already exists. Remove it manually or init in a different path.",
            config.config_path.display()
        );
    }

    init_structure(config)?;
    init_default_config(config)?;

    log!("init"; "{}", config.get_root().display());
    Ok(())
}

/// Write the default configuration file
fn init_default_config(config: &ProjectConfig) -> Result<()> {
    let content = toml::to_string_pretty(&ProjectConfig::default())?;
    let path = &config.config_path;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Create the documents root and its common directory
fn init_structure(config: &ProjectConfig) -> Result<()> {
    let common = config.documents.common_dir();
    fs::create_dir_all(&common)
        .with_context(|| format!("Failed to create {}", common.display()))?;
    Ok(())
}
