//! Content model structs for articles, categories and editor drafts.

use crate::slug::generate_slug;
use chrono::{DateTime, Utc};
use parawiki_types::{ArticleId, CategoryId};
use serde::{Deserialize, Deserializer, Serialize};

/// A category articles are grouped into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Color used for visual tagging (badges, sidebar dots). Not validated.
    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Display position; categories are always listed ascending by this key
    #[serde(default)]
    pub order: i64,
}

/// A persisted wiki article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,

    /// Display title, source of the generated slug
    pub title: String,

    /// URL identifier (e.g., "guia-de-faccoes")
    pub slug: String,

    /// Owning category. Empty only for records that skipped validation.
    #[serde(default)]
    pub category_id: CategoryId,

    /// Short preview text, also matched by search
    #[serde(default)]
    pub summary: Option<String>,

    /// Rich text payload, opaque to this crate
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub published: bool,

    pub created_date: DateTime<Utc>,

    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,

    /// View counter, owned by the store
    #[serde(default, deserialize_with = "null_as_zero")]
    pub views: u64,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

impl Article {
    /// Whether the article points at a category at all
    pub fn has_category(&self) -> bool {
        !self.category_id.is_empty()
    }

    /// Summary, ignoring empty strings
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.is_empty())
    }

    /// Cover image URL, ignoring empty strings
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|s| !s.is_empty())
    }

    /// Upper-cased first character of the title, shown in place of a missing cover image
    pub fn initial(&self) -> Option<String> {
        self.title
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
    }
}

/// Editor form state for a new or existing article.
///
/// Every field is a plain value so a half-filled form can be represented;
/// [`crate::validation::validate_submission`] decides whether it may be sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDraft {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub category_id: CategoryId,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub featured: bool,

    #[serde(default = "default_true")]
    pub published: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            category_id: CategoryId::default(),
            content: String::new(),
            summary: String::new(),
            image_url: String::new(),
            featured: false,
            published: true,
        }
    }
}

impl ArticleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the title and regenerate the slug from it
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.slug = generate_slug(&self.title);
    }

    /// Override the slug without touching the title
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    pub fn with_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = category_id.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Summary as stored on the article (empty means absent)
    pub fn summary_value(&self) -> Option<String> {
        non_empty(&self.summary)
    }

    /// Image URL as stored on the article (empty means absent)
    pub fn image_url_value(&self) -> Option<String> {
        non_empty(&self.image_url)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl From<&Article> for ArticleDraft {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            slug: article.slug.clone(),
            category_id: article.category_id.clone(),
            content: article.content.clone(),
            summary: article.summary.clone().unwrap_or_default(),
            image_url: article.image_url.clone().unwrap_or_default(),
            featured: article.featured,
            published: article.published,
        }
    }
}
