//! Listing criteria, filtering and sorting.
//!
//! Filtering never reorders: callers sort the source collection first (the
//! store does this through [`SortKey`]) and [`filter_articles`] keeps the
//! relative order of whatever survives.

use crate::models::{Article, Category};
use parawiki_types::CategoryId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sentinel accepted wherever a category filter is parsed from text
pub const ALL_CATEGORIES: &str = "all";

/// Category restriction of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    pub fn matches(&self, category_id: &CategoryId) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => id == category_id,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(CategoryId::new(s))
        })
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(id) => f.write_str(id.as_str()),
        }
    }
}

/// Immutable filter options for an article listing.
///
/// The UI keeps the current value and swaps it for a new one when the search
/// box or category tab changes; filtering itself is stateless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCriteria {
    pub search_query: String,
    pub category: CategoryFilter,
    pub published_only: bool,
}

impl Default for ArticleCriteria {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            category: CategoryFilter::All,
            published_only: true,
        }
    }
}

impl ArticleCriteria {
    /// Criteria of a public listing (published only, no search, every category)
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria of a category page
    pub fn category_page(category_id: CategoryId) -> Self {
        Self {
            category: CategoryFilter::Only(category_id),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_published_only(mut self, published_only: bool) -> Self {
        self.published_only = published_only;
        self
    }

    /// True when the user narrowed the listing (search text or a category tab).
    /// Decides between the "no matches" and "nothing published yet" empty states.
    pub fn narrows(&self) -> bool {
        !self.search_query.is_empty() || !self.category.is_all()
    }

    /// Check a single article against every active criterion
    pub fn matches(&self, article: &Article) -> bool {
        self.matches_lowered(article, &self.search_query.to_lowercase())
    }

    fn matches_lowered(&self, article: &Article, query_lower: &str) -> bool {
        if self.published_only && !article.published {
            return false;
        }

        if !self.category.matches(&article.category_id) {
            return false;
        }

        query_lower.is_empty() || matches_search(article, query_lower)
    }
}

fn matches_search(article: &Article, query_lower: &str) -> bool {
    article.title.to_lowercase().contains(query_lower)
        || article
            .summary
            .as_deref()
            .is_some_and(|summary| summary.to_lowercase().contains(query_lower))
}

/// Filter articles by criteria, preserving input order
pub fn filter_articles<'a>(articles: &'a [Article], criteria: &ArticleCriteria) -> Vec<&'a Article> {
    let query_lower = criteria.search_query.to_lowercase();

    let filtered: Vec<&Article> = articles
        .iter()
        .filter(|article| criteria.matches_lowered(article, &query_lower))
        .collect();

    tracing::debug!(
        "Filtered {} of {} articles (query: {:?}, category: {})",
        filtered.len(),
        articles.len(),
        criteria.search_query,
        criteria.category
    );

    filtered
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SortKeyError {
    #[error("Empty sort key")]
    Empty,

    #[error("Unknown sort field: {0}")]
    UnknownField(String),
}

/// Field a collection can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedDate,
    UpdatedDate,
    Title,
    Views,
    Order,
    Name,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedDate => "created_date",
            SortField::UpdatedDate => "updated_date",
            SortField::Title => "title",
            SortField::Views => "views",
            SortField::Order => "order",
            SortField::Name => "name",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "created_date" => Some(SortField::CreatedDate),
            "updated_date" => Some(SortField::UpdatedDate),
            "title" => Some(SortField::Title),
            "views" => Some(SortField::Views),
            "order" => Some(SortField::Order),
            "name" => Some(SortField::Name),
            _ => None,
        }
    }
}

/// Sort order in the store's string notation:
/// `"order"` ascending, `"-created_date"` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub const fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Default article listing order: newest first
    pub const fn newest_first() -> Self {
        Self::descending(SortField::CreatedDate)
    }

    /// Category listing order
    pub const fn by_order() -> Self {
        Self::ascending(SortField::Order)
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (descending, name) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        if name.is_empty() {
            return Err(SortKeyError::Empty);
        }

        let field = SortField::parse(name).ok_or_else(|| SortKeyError::UnknownField(name.to_string()))?;
        Ok(Self { field, descending })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}

/// Stable sort of articles. Fields that do not apply to articles
/// (`order`, `name`) leave the input order untouched.
pub fn sort_articles(articles: &mut [Article], key: SortKey) {
    articles.sort_by(|a, b| {
        let ordering = match key.field {
            SortField::CreatedDate => a.created_date.cmp(&b.created_date),
            SortField::UpdatedDate => a.updated_date.cmp(&b.updated_date),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Views => a.views.cmp(&b.views),
            SortField::Order | SortField::Name => Ordering::Equal,
        };
        key.apply(ordering)
    });
}

/// Stable sort of categories. Fields that do not apply to categories leave
/// the input order untouched.
pub fn sort_categories(categories: &mut [Category], key: SortKey) {
    categories.sort_by(|a, b| {
        let ordering = match key.field {
            SortField::Order => a.order.cmp(&b.order),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            _ => Ordering::Equal,
        };
        key.apply(ordering)
    });
}
