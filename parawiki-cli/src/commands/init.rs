//! Init command implementation.

use anyhow::{Context, Result};
use parawiki_core::{Config, FileStore, NewCategory};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../parawiki.yml.example");

/// Initialize a new wiki in `path` (defaults to the current directory)
pub fn init_wiki(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    let config_path = write_config(root)?;
    scaffold_data(&config_path)?;

    println!("✓ parawiki initialized in {:?}", root);
    println!("  - Edit parawiki.yml to customize site metadata");
    println!("  - Add categories with `parawiki add-category` and articles with `parawiki new`");
    Ok(())
}

fn write_config(root: &Path) -> Result<std::path::PathBuf> {
    let config_path = root.join("parawiki.yml");
    if config_path.exists() {
        println!("parawiki.yml already exists at {:?}", config_path);
        return Ok(config_path);
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(config_path)
}

fn scaffold_data(config_path: &Path) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let data_path = config.data_path();
    if data_path.exists() {
        return Ok(());
    }

    let store = FileStore::from_config(&config)?;
    let category = store.create_category(NewCategory {
        name: "Geral".to_string(),
        color: "#10b981".to_string(),
        description: Some("Artigos sem uma categoria mais específica".to_string()),
        order: 0,
    })?;

    fs::create_dir_all(config.uploads_dir())
        .with_context(|| format!("Failed to create {:?}", config.uploads_dir()))?;

    println!("Created {:?} with category '{}' ({})", data_path, category.name, category.id);
    Ok(())
}
