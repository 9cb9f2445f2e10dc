//! Loading the configured wiki for a command.

use anyhow::{Context, Result};
use parawiki_core::{Config, FileStore, Wiki};
use std::path::Path;

/// Load config and open the file-backed store it points at.
pub fn open_wiki(config_path: &Path) -> Result<Wiki<FileStore>> {
    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

    let store = FileStore::from_config(&config).context("Failed to open wiki data")?;
    tracing::debug!("Opened wiki data at {:?}", store.path());

    Ok(Wiki::new(store, config))
}
