//! Category listing and creation.

use crate::context::open_wiki;
use crate::payload::{self, CategoryData};
use anyhow::{Context, Result};
use parawiki_core::NewCategory;
use std::path::Path;

/// List categories in display order with their published article counts
pub fn list_categories(config_path: &Path, json: bool) -> Result<()> {
    let wiki = open_wiki(config_path)?;
    let overview = wiki.overview().context("Failed to fetch categories")?;
    let counts = overview.category_counts();
    let plural = wiki.config().labels.article_count();

    if json {
        let data: Vec<CategoryData> = counts
            .iter()
            .map(|(category, n)| CategoryData::new(category, Some(*n)))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload::envelope("categories.list", data))?
        );
        return Ok(());
    }

    if counts.is_empty() {
        println!("{}", wiki.config().labels.no_categories);
        return Ok(());
    }

    for (category, n) in counts {
        println!(
            "{:>3}  {} [{}]  {}  ({})",
            category.order,
            category.name,
            category.color,
            category.id,
            plural.count_label(n)
        );
        if let Some(description) = &category.description {
            println!("       {}", description);
        }
    }

    Ok(())
}

/// Create a category in the local data file
pub fn add_category(config_path: &Path, new: NewCategory, json: bool) -> Result<()> {
    if new.name.trim().is_empty() {
        anyhow::bail!("Category name must not be empty");
    }

    let wiki = open_wiki(config_path)?;
    let category = wiki
        .store()
        .create_category(new)
        .context("Failed to create category")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload::envelope(
                "category.created",
                CategoryData::new(&category, Some(0))
            ))?
        );
    } else {
        println!("✓ Created category '{}' ({})", category.name, category.id);
    }

    Ok(())
}
