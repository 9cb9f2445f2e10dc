//! Single-article commands: show, create, edit and delete.

use crate::commands::browse::print_card;
use crate::context::open_wiki;
use crate::payload::{self, ArticleData};
use anyhow::{Context, Result};
use parawiki_core::{
    attach_category, attach_image, Article, ArticleDraft, ArticleId, Category, ContentStore,
    FileStore, Wiki,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Form fields accepted by `new` and `edit`.
///
/// For `edit`, `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ArticleFields {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image: Option<PathBuf>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
}

impl ArticleFields {
    /// Apply the given fields to a draft, in the order the editor would
    fn apply(self, draft: &mut ArticleDraft) -> Option<PathBuf> {
        if let Some(title) = self.title {
            draft.set_title(title);
        }
        // An explicit slug wins over the one derived from the title
        if let Some(slug) = self.slug {
            draft.set_slug(slug);
        }
        if let Some(category) = self.category {
            draft.category_id = category.into();
        }
        if let Some(content) = self.content {
            draft.content = content;
        }
        if let Some(summary) = self.summary {
            draft.summary = summary;
        }
        if let Some(featured) = self.featured {
            draft.featured = featured;
        }
        if let Some(published) = self.published {
            draft.published = published;
        }
        self.image
    }
}

/// Print one article with its category, optionally counting it as a read
pub fn show_article(config_path: &Path, id: &str, count_view: bool, json: bool) -> Result<()> {
    let wiki = open_wiki(config_path)?;
    let id = ArticleId::new(id);
    if count_view {
        wiki.record_view(&id)?;
    }
    let page = wiki.article(&id)?;
    let view = page.view();

    if json {
        let payload = payload::envelope("article.full", ArticleData::from_view(&view));
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let labels = &wiki.config().labels;
    println!();
    print_card(&view, labels);
    if view.is_uncategorized() {
        println!("  ({})", labels.uncategorized);
    }
    if let Some(url) = page.article.image() {
        println!("  image: {}", url);
    }
    if let Some(updated) = page.article.updated_date {
        println!("  updated: {}", labels.date_style().format(&updated));
    }
    println!("\n{}", page.article.content);
    Ok(())
}

/// Create an article from the given fields
pub fn new_article(config_path: &Path, fields: ArticleFields, json: bool) -> Result<()> {
    let wiki = open_wiki(config_path)?;

    let mut draft = ArticleDraft::new();
    let image = fields.apply(&mut draft);
    wiki.check_submission(None, &draft)?;
    upload_image(&wiki, &mut draft, image.as_deref())?;

    let article = wiki.save(None, &draft)?;
    report_saved(&wiki, &article, "Created", json)
}

/// Load an article into a draft, apply the changes and save it back
pub fn edit_article(config_path: &Path, id: &str, fields: ArticleFields, json: bool) -> Result<()> {
    let wiki = open_wiki(config_path)?;
    let id = ArticleId::new(id);
    let existing = wiki.store().get_article(&id)?;

    let mut draft = ArticleDraft::from(&existing);
    let image = fields.apply(&mut draft);
    wiki.check_submission(Some(&id), &draft)?;
    upload_image(&wiki, &mut draft, image.as_deref())?;

    let article = wiki.save(Some(&id), &draft)?;
    report_saved(&wiki, &article, "Updated", json)
}

pub fn delete_article(config_path: &Path, id: &str) -> Result<()> {
    let wiki = open_wiki(config_path)?;
    let id = ArticleId::new(id);
    wiki.delete(&id)?;
    println!("✓ Deleted article {}", id);
    Ok(())
}

fn upload_image(wiki: &Wiki<FileStore>, draft: &mut ArticleDraft, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let bytes = fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    attach_image(wiki.store(), draft, file_name, &bytes)?;
    Ok(())
}

fn report_saved(wiki: &Wiki<FileStore>, article: &Article, verb: &str, json: bool) -> Result<()> {
    let categories: Vec<Category> = wiki.categories()?;
    let view = attach_category(article, &categories);

    if json {
        let payload = payload::envelope("article.saved", ArticleData::from_view(&view));
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("✓ {} '{}' ({})", verb, article.title, article.slug);
        println!("  id: {}", article.id);
        if view.is_uncategorized() {
            tracing::warn!("Category {} does not exist", article.category_id);
        }
    }

    Ok(())
}

