//! Article listings: all articles and single category pages.

use crate::context::open_wiki;
use crate::payload::{self, CategoryData, CategoryPageData, ListingData};
use anyhow::{Context, Result};
use parawiki_core::{ArticleCriteria, ArticleView, CategoryFilter, CategoryId, Listing};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct BrowseOptions {
    pub search: String,
    pub category: CategoryFilter,
    pub include_drafts: bool,
    pub json: bool,
}

/// List articles, newest first, narrowed by search text and category
pub fn browse_articles(config_path: &Path, opts: BrowseOptions) -> Result<()> {
    let wiki = open_wiki(config_path)?;

    let criteria = ArticleCriteria::new()
        .with_search(opts.search)
        .with_category(opts.category)
        .with_published_only(!opts.include_drafts);

    let page = wiki.browse(&criteria).context("Failed to fetch articles")?;
    let listing = page.listing();

    if opts.json {
        let payload = payload::envelope("articles.list", ListingData::new(&listing));
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("\n{}\n", wiki.config().site.title);
    print_listing(&listing, &wiki.config().labels);
    Ok(())
}

/// Show one category and its published articles
pub fn show_category(config_path: &Path, id: &str, json: bool) -> Result<()> {
    let wiki = open_wiki(config_path)?;
    let page = wiki.category_page(&CategoryId::new(id))?;
    let listing = page.listing();

    if json {
        let payload = payload::envelope(
            "category.page",
            CategoryPageData {
                category: CategoryData::new(&page.category, Some(listing.len())),
                listing: ListingData::new(&listing),
            },
        );
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("\n{}", page.category.name);
    if let Some(description) = &page.category.description {
        println!("{}", description);
    }
    println!();
    print_listing(&listing, &wiki.config().labels);
    Ok(())
}

fn print_listing(listing: &Listing<'_>, labels: &parawiki_core::config::LabelsConfig) {
    if let Some(state) = listing.empty_state {
        println!("{}", labels.empty_message(state));
        return;
    }

    println!("{}\n", listing.count_label);
    for view in &listing.articles {
        print_card(view, labels);
    }
}

pub(crate) fn print_card(view: &ArticleView<'_>, labels: &parawiki_core::config::LabelsConfig) {
    // Format:
    // [Reinos] Capital do Norte (capital-do-norte)
    //   01 mar 2024 · 12 visualizações
    //   A maior cidade do continente
    //
    let article = view.article;
    let badge = match view.badge() {
        Some((name, _color)) => format!("[{}] ", name),
        None => String::new(),
    };
    let mut flags = String::new();
    if article.featured {
        flags.push_str(" ★");
    }
    if !article.published {
        flags.push_str(&format!(" ({})", labels.draft));
    }

    println!("{}{} ({}){}", badge, article.title, article.slug, flags);
    println!(
        "  {} · {} {}",
        view.display_date(&labels.date_style()),
        article.views,
        labels.views
    );
    if let Some(summary) = article.summary() {
        println!("  {}", summary);
    }
    println!("  id: {}", article.id);
    println!();
}
