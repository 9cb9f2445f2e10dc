//! View assembly: joining articles to their category and deriving display data.

use crate::models::{Article, Category};
use crate::query::ArticleCriteria;
use chrono::{DateTime, Locale, Utc};
use parawiki_types::CategoryId;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// Fallback pattern when a configured one cannot be rendered
const FALLBACK_DATE_PATTERN: &str = "%Y-%m-%d";

/// Strftime pattern plus the locale used for month and weekday names
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateStyle<'a> {
    pub pattern: &'a str,
    pub locale: Locale,
}

impl<'a> DateStyle<'a> {
    pub fn new(pattern: &'a str, locale: Locale) -> Self {
        Self { pattern, locale }
    }

    /// Render a timestamp. An unrenderable pattern falls back to `%Y-%m-%d`
    /// instead of panicking.
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format_localized(self.pattern, self.locale)).is_ok() {
            return out;
        }

        tracing::warn!("Invalid date format {:?}, using {}", self.pattern, FALLBACK_DATE_PATTERN);
        date.format(FALLBACK_DATE_PATTERN).to_string()
    }
}

/// An article together with the category it belongs to.
///
/// Every listing context (grid card, category page, search result) renders
/// this one type. `category` is `None` for uncategorized articles and for
/// articles whose category no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArticleView<'a> {
    pub article: &'a Article,
    pub category: Option<&'a Category>,
}

impl<'a> ArticleView<'a> {
    pub fn new(article: &'a Article, category: Option<&'a Category>) -> Self {
        Self { article, category }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_none()
    }

    /// Badge text and color, when the article has a category
    pub fn badge(&self) -> Option<(&'a str, &'a str)> {
        self.category.map(|c| (c.name.as_str(), c.color.as_str()))
    }

    /// Creation date as shown on cards
    pub fn display_date(&self, style: &DateStyle<'_>) -> String {
        style.format(&self.article.created_date)
    }
}

/// Join one article to its category by scanning the collection.
///
/// A missing or dangling `category_id` yields an uncategorized view.
pub fn attach_category<'a>(article: &'a Article, categories: &'a [Category]) -> ArticleView<'a> {
    let category = categories.iter().find(|c| c.id == article.category_id);
    ArticleView::new(article, category)
}

/// Categories indexed by id, built once per render
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex<'a> {
    by_id: HashMap<&'a CategoryId, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        for category in categories {
            // First occurrence wins, same as a linear scan
            by_id.entry(&category.id).or_insert(category);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &CategoryId) -> Option<&'a Category> {
        self.by_id.get(id).copied()
    }

    pub fn attach(&self, article: &'a Article) -> ArticleView<'a> {
        let category = self.get(&article.category_id);
        if category.is_none() && article.has_category() {
            tracing::warn!(
                "Article {} references missing category {}",
                article.id,
                article.category_id
            );
        }
        ArticleView::new(article, category)
    }

    pub fn attach_all<I>(&self, articles: I) -> Vec<ArticleView<'a>>
    where
        I: IntoIterator<Item = &'a Article>,
    {
        articles.into_iter().map(|a| self.attach(a)).collect()
    }
}

/// Singular/plural noun pair for counts ("1 artigo", "3 artigos")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pluralization {
    pub singular: String,
    pub plural: String,
}

impl Pluralization {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Singular at exactly one, plural otherwise (including zero)
    pub fn noun(&self, count: usize) -> &str {
        if count == 1 {
            &self.singular
        } else {
            &self.plural
        }
    }

    pub fn count_label(&self, count: usize) -> String {
        format!("{} {}", count, self.noun(count))
    }
}

impl Default for Pluralization {
    fn default() -> Self {
        Self::new("artigo", "artigos")
    }
}

/// Most recently created article
pub fn most_recent<'a, I>(articles: I) -> Option<&'a Article>
where
    I: IntoIterator<Item = &'a Article>,
{
    // On ties the earliest article in input order wins
    articles
        .into_iter()
        .fold(None, |best: Option<&Article>, article| match best {
            Some(b) if b.created_date >= article.created_date => Some(b),
            _ => Some(article),
        })
}

/// Featured articles, in input order
pub fn featured<'a, I>(articles: I) -> Vec<&'a Article>
where
    I: IntoIterator<Item = &'a Article>,
{
    articles.into_iter().filter(|a| a.featured).collect()
}

/// Number of published articles per category, in category order
pub fn category_counts<'a>(
    articles: &[Article],
    categories: &'a [Category],
) -> Vec<(&'a Category, usize)> {
    let mut counts: HashMap<&CategoryId, usize> = HashMap::new();
    for article in articles.iter().filter(|a| a.published) {
        *counts.entry(&article.category_id).or_default() += 1;
    }

    categories
        .iter()
        .map(|c| (c, counts.get(&c.id).copied().unwrap_or(0)))
        .collect()
}

/// What an empty listing should tell the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// Nothing has been published (in this scope) yet
    NoArticlesYet,
    /// A search or category filter excluded everything
    NoMatches,
}

/// A filtered, category-joined article listing ready for display
#[derive(Debug, Clone, Serialize)]
pub struct Listing<'a> {
    pub articles: Vec<ArticleView<'a>>,
    pub count_label: String,
    pub empty_state: Option<EmptyState>,
}

impl<'a> Listing<'a> {
    /// Filter `articles` (already sorted) by `criteria` and join categories
    pub fn assemble(
        articles: &'a [Article],
        categories: &'a [Category],
        criteria: &ArticleCriteria,
        plural: &Pluralization,
    ) -> Self {
        let index = CategoryIndex::new(categories);
        let views = index.attach_all(crate::query::filter_articles(articles, criteria));
        Self::from_views(views, criteria.narrows(), plural)
    }

    pub fn from_views(articles: Vec<ArticleView<'a>>, narrowed: bool, plural: &Pluralization) -> Self {
        let count_label = plural.count_label(articles.len());
        let empty_state = if !articles.is_empty() {
            None
        } else if narrowed {
            Some(EmptyState::NoMatches)
        } else {
            Some(EmptyState::NoArticlesYet)
        };

        Self {
            articles,
            count_label,
            empty_state,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
