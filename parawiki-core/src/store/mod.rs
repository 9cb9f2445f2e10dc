//! Persistence collaborator interface and local implementations.
//!
//! The wiki core only ever sees snapshots returned by a [`ContentStore`].
//! [`MemoryStore`] and [`FileStore`] are local stand-ins for the remote
//! service; both keep the same [`WikiData`] document and enforce slug
//! uniqueness on write.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::models::{Article, ArticleDraft, Category};
use crate::query::{sort_articles, sort_categories, SortKey};
use crate::validation::ValidationError;
use chrono::Utc;
use parawiki_types::{ArticleId, CategoryId, RecordKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to fetch {what}: {reason}")]
    Fetch { what: &'static str, reason: String },

    #[error("Failed to upload {file}: {reason}")]
    Upload { file: String, reason: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("Failed to save wiki data: {0}")]
    Persist(String),
}

impl StoreError {
    pub fn article_not_found(id: &ArticleId) -> Self {
        StoreError::NotFound {
            kind: RecordKind::Article,
            id: id.to_string(),
        }
    }

    pub fn category_not_found(id: &CategoryId) -> Self {
        StoreError::NotFound {
            kind: RecordKind::Category,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Server-side narrowing for [`ContentStore::list_articles`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub published: Option<bool>,
    pub category_id: Option<CategoryId>,
}

impl ArticleFilter {
    /// Every article, drafts included
    pub fn any() -> Self {
        Self::default()
    }

    /// Published articles only
    pub fn published() -> Self {
        Self {
            published: Some(true),
            category_id: None,
        }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.published.map_or(true, |p| article.published == p)
            && self
                .category_id
                .as_ref()
                .map_or(true, |id| &article.category_id == id)
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}

/// Collection fetches and article mutations offered by the persistence collaborator
pub trait ContentStore {
    fn list_categories(&self, sort: SortKey) -> Result<Vec<Category>, StoreError>;

    fn get_category(&self, id: &CategoryId) -> Result<Category, StoreError>;

    fn list_articles(
        &self,
        filter: &ArticleFilter,
        sort: SortKey,
        limit: Option<usize>,
    ) -> Result<Vec<Article>, StoreError>;

    fn get_article(&self, id: &ArticleId) -> Result<Article, StoreError>;

    fn create_article(&self, draft: &ArticleDraft) -> Result<Article, StoreError>;

    fn update_article(&self, id: &ArticleId, draft: &ArticleDraft) -> Result<Article, StoreError>;

    fn delete_article(&self, id: &ArticleId) -> Result<(), StoreError>;

    /// Count one read of an article, returning the new total
    fn record_view(&self, id: &ArticleId) -> Result<u64, StoreError>;
}

/// File upload capability used to populate `image_url`
pub trait AssetStore {
    fn upload_file(&self, file_name: &str, bytes: &[u8]) -> Result<UploadedFile, StoreError>;
}

/// Input for creating a category in a local store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
}

/// Complete wiki document as kept by the local stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WikiData {
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub articles: Vec<Article>,
}

pub(crate) fn new_record_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl WikiData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_categories(&self, sort: SortKey) -> Vec<Category> {
        let mut categories = self.categories.clone();
        sort_categories(&mut categories, sort);
        categories
    }

    pub fn get_category(&self, id: &CategoryId) -> Result<Category, StoreError> {
        self.categories
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::category_not_found(id))
    }

    pub fn list_articles(
        &self,
        filter: &ArticleFilter,
        sort: SortKey,
        limit: Option<usize>,
    ) -> Vec<Article> {
        let mut articles: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        sort_articles(&mut articles, sort);
        if let Some(limit) = limit {
            articles.truncate(limit);
        }
        articles
    }

    pub fn get_article(&self, id: &ArticleId) -> Result<Article, StoreError> {
        self.articles
            .iter()
            .find(|a| &a.id == id)
            .cloned()
            .ok_or_else(|| StoreError::article_not_found(id))
    }

    fn ensure_slug_free(&self, slug: &str, owner: Option<&ArticleId>) -> Result<(), StoreError> {
        let taken = self
            .articles
            .iter()
            .any(|a| a.slug == slug && Some(&a.id) != owner);
        if taken {
            return Err(StoreError::SlugTaken(slug.to_string()));
        }
        Ok(())
    }

    pub fn create_article(&mut self, draft: &ArticleDraft) -> Result<Article, StoreError> {
        self.ensure_slug_free(&draft.slug, None)?;

        let article = Article {
            id: ArticleId::new(new_record_id()),
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            category_id: draft.category_id.clone(),
            summary: draft.summary_value(),
            content: draft.content.clone(),
            image_url: draft.image_url_value(),
            featured: draft.featured,
            published: draft.published,
            created_date: Utc::now(),
            updated_date: None,
            views: 0,
        };

        self.articles.push(article.clone());
        Ok(article)
    }

    /// Replace the editable fields of an article. Id, creation date and view
    /// count are kept.
    pub fn update_article(
        &mut self,
        id: &ArticleId,
        draft: &ArticleDraft,
    ) -> Result<Article, StoreError> {
        let index = self
            .articles
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| StoreError::article_not_found(id))?;
        self.ensure_slug_free(&draft.slug, Some(id))?;

        let article = &mut self.articles[index];
        article.title = draft.title.clone();
        article.slug = draft.slug.clone();
        article.category_id = draft.category_id.clone();
        article.summary = draft.summary_value();
        article.content = draft.content.clone();
        article.image_url = draft.image_url_value();
        article.featured = draft.featured;
        article.published = draft.published;
        article.updated_date = Some(Utc::now());

        Ok(article.clone())
    }

    pub fn delete_article(&mut self, id: &ArticleId) -> Result<(), StoreError> {
        let before = self.articles.len();
        self.articles.retain(|a| &a.id != id);
        if self.articles.len() == before {
            return Err(StoreError::article_not_found(id));
        }
        Ok(())
    }

    pub fn record_view(&mut self, id: &ArticleId) -> Result<u64, StoreError> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| StoreError::article_not_found(id))?;
        article.views = article.views.saturating_add(1);
        Ok(article.views)
    }

    pub fn create_category(&mut self, new: NewCategory) -> Category {
        let category = Category {
            id: CategoryId::new(new_record_id()),
            name: new.name,
            color: new.color,
            description: new.description,
            order: new.order,
        };
        self.categories.push(category.clone());
        category
    }
}
