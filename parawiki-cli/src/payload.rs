//! Shared JSON schema helpers for machine-readable command output.

use parawiki_core::{Article, ArticleView, Category, EmptyState, Listing};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "2024-11-wiki-v1";

/// Standard envelope for machine-consumable responses.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub kind: &'static str,
    pub data: T,
}

pub fn envelope<T>(kind: &'static str, data: T) -> Envelope<T> {
    Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        data,
    }
}

#[derive(Serialize)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub order: i64,
    pub articles: Option<usize>,
}

impl CategoryData {
    pub fn new(category: &Category, articles: Option<usize>) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            color: category.color.clone(),
            description: category.description.clone(),
            order: category.order,
            articles,
        }
    }
}

/// Everything a grid card shows
#[derive(Serialize)]
pub struct ArticleCard {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub initial: Option<String>,
    pub category: Option<CategoryData>,
    pub featured: bool,
    pub published: bool,
    pub created_date: String,
    pub views: u64,
}

impl ArticleCard {
    pub fn from_view(view: &ArticleView<'_>) -> Self {
        let article = view.article;
        Self {
            id: article.id.to_string(),
            slug: article.slug.clone(),
            title: article.title.clone(),
            summary: article.summary().map(String::from),
            image_url: article.image().map(String::from),
            initial: article.initial(),
            category: view.category.map(|c| CategoryData::new(c, None)),
            featured: article.featured,
            published: article.published,
            created_date: article.created_date.to_rfc3339(),
            views: article.views,
        }
    }
}

#[derive(Serialize)]
pub struct ListingData {
    pub total: usize,
    pub count_label: String,
    pub empty_state: Option<EmptyState>,
    pub articles: Vec<ArticleCard>,
}

impl ListingData {
    pub fn new(listing: &Listing<'_>) -> Self {
        Self {
            total: listing.len(),
            count_label: listing.count_label.clone(),
            empty_state: listing.empty_state,
            articles: listing.articles.iter().map(ArticleCard::from_view).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct CategoryPageData {
    pub category: CategoryData,
    pub listing: ListingData,
}

#[derive(Serialize)]
pub struct ArticleData {
    #[serde(flatten)]
    pub card: ArticleCard,
    pub content: String,
    pub updated_date: Option<String>,
}

impl ArticleData {
    pub fn from_view(view: &ArticleView<'_>) -> Self {
        let article: &Article = view.article;
        Self {
            card: ArticleCard::from_view(view),
            content: article.content.clone(),
            updated_date: article.updated_date.map(|d| d.to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
pub struct SlugData {
    pub title: String,
    pub slug: String,
}
