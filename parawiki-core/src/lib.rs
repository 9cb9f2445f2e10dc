//! # parawiki-core
//!
//! Core library for the parawiki content wiki.
//!
//! This crate defines articles and categories, turns titles into slugs,
//! filters and orders listings, joins articles to their categories for
//! display and gates editor submissions. Everything here works on in-memory
//! snapshots handed out by a [`store::ContentStore`].

pub mod config;
pub mod models;
pub mod query;
pub mod slug;
pub mod store;
pub mod validation;
pub mod view;
pub mod wiki;

pub use config::Config;
pub use models::{Article, ArticleDraft, Category};
pub use parawiki_types::{ArticleId, CategoryId, RecordKind};
pub use query::{filter_articles, ArticleCriteria, CategoryFilter, SortField, SortKey};
pub use slug::generate_slug;
pub use store::{
    ArticleFilter, AssetStore, ContentStore, FileStore, MemoryStore, NewCategory, StoreError,
    UploadedFile, WikiData,
};
pub use validation::{validate_submission, RequiredField, ValidationError};
pub use view::{
    attach_category, ArticleView, CategoryIndex, DateStyle, EmptyState, Listing, Pluralization,
};
pub use wiki::{attach_image, ArticlePage, BrowsePage, CategoryPage, Overview, Wiki};
