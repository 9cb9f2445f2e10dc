//! Configuration parsing and management.

use crate::view::{DateStyle, EmptyState, Pluralization};
use chrono::format::{Item, StrftimeItems};
use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: String, value: String },
}

/// Main configuration struct matching the parawiki.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    /// Prefix for URLs handed out by the asset store
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub labels: LabelsConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    String::from("/")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON data file holding categories and articles
    #[serde(default = "default_data_path")]
    pub data: PathBuf,

    /// Directory uploaded images are copied into
    #[serde(default = "default_uploads_path")]
    pub uploads: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("wiki.json")
}

fn default_uploads_path() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: default_data_path(),
            uploads: default_uploads_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Cap on articles fetched for a category page. Unbounded when unset.
    #[serde(default)]
    pub category_page_limit: Option<usize>,

    /// Cap on articles fetched for the all-articles page. Unbounded when unset.
    #[serde(default)]
    pub browse_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    #[serde(default = "default_article_singular")]
    pub article_singular: String,

    #[serde(default = "default_article_plural")]
    pub article_plural: String,

    #[serde(default = "default_views_label")]
    pub views: String,

    /// chrono format string for card dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Locale for month and weekday names in dates, e.g. "pt_BR"
    #[serde(default = "default_date_locale")]
    pub date_locale: String,

    /// Marker shown next to unpublished articles
    #[serde(default = "default_draft_label")]
    pub draft: String,

    /// Shown where an article has no (existing) category
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized: String,

    #[serde(default = "default_no_categories")]
    pub no_categories: String,

    /// Shown when a search or category filter leaves nothing
    #[serde(default = "default_no_matches")]
    pub no_matches: String,

    /// Shown when nothing is published yet
    #[serde(default = "default_no_articles")]
    pub no_articles: String,
}

fn default_article_singular() -> String {
    String::from("artigo")
}

fn default_article_plural() -> String {
    String::from("artigos")
}

fn default_views_label() -> String {
    String::from("visualizações")
}

fn default_date_format() -> String {
    String::from("%d %b %Y")
}

fn default_date_locale() -> String {
    String::from("pt_BR")
}

fn default_draft_label() -> String {
    String::from("rascunho")
}

fn default_uncategorized_label() -> String {
    String::from("sem categoria")
}

fn default_no_categories() -> String {
    String::from("Nenhuma categoria cadastrada ainda.")
}

fn default_no_matches() -> String {
    String::from("Nenhum artigo encontrado com os filtros aplicados.")
}

fn default_no_articles() -> String {
    String::from("Nenhum artigo publicado ainda.")
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            article_singular: default_article_singular(),
            article_plural: default_article_plural(),
            views: default_views_label(),
            date_format: default_date_format(),
            date_locale: default_date_locale(),
            draft: default_draft_label(),
            uncategorized: default_uncategorized_label(),
            no_categories: default_no_categories(),
            no_matches: default_no_matches(),
            no_articles: default_no_articles(),
        }
    }
}

impl LabelsConfig {
    pub fn article_count(&self) -> Pluralization {
        Pluralization::new(&self.article_singular, &self.article_plural)
    }

    pub fn empty_message(&self, state: EmptyState) -> &str {
        match state {
            EmptyState::NoMatches => &self.no_matches,
            EmptyState::NoArticlesYet => &self.no_articles,
        }
    }

    /// Date pattern and locale for rendering timestamps
    pub fn date_style(&self) -> DateStyle<'_> {
        let locale = parse_locale(&self.date_locale).unwrap_or(Locale::POSIX);
        DateStyle::new(&self.date_format, locale)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, value: &str| ConfigError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        };

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid("labels.date_format", &self.date_format));
        }
        if parse_locale(&self.date_locale).is_none() {
            return Err(invalid("labels.date_locale", &self.date_locale));
        }

        Ok(())
    }
}

fn parse_locale(name: &str) -> Option<Locale> {
    Locale::try_from(name).ok()
}

impl Config {
    /// Minimal configuration with defaults for everything but the title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                description: None,
            },
            paths: PathsConfig::default(),
            base_url: default_base_url(),
            listing: ListingConfig::default(),
            labels: LabelsConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;

        if config.site.title.trim().is_empty() {
            return Err(ConfigError::MissingField("site.title".to_string()));
        }
        config.labels.validate()?;

        Ok(config)
    }

    /// Get the data file, resolved relative to config file
    pub fn data_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.data)
    }

    /// Get the uploads directory, resolved relative to config file
    pub fn uploads_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.uploads)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Get a nested config value using dotted path (e.g., "site.title")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["site", "title"] => Some(self.site.title.clone()),
            ["site", "description"] => self.site.description.clone(),
            ["base_url"] => Some(self.base_url.clone()),
            ["listing", "category_page_limit"] => {
                self.listing.category_page_limit.map(|n| n.to_string())
            }
            ["listing", "browse_limit"] => self.listing.browse_limit.map(|n| n.to_string()),
            ["labels", "article_singular"] => Some(self.labels.article_singular.clone()),
            ["labels", "article_plural"] => Some(self.labels.article_plural.clone()),
            ["labels", "date_format"] => Some(self.labels.date_format.clone()),
            ["labels", "date_locale"] => Some(self.labels.date_locale.clone()),
            _ => None,
        }
    }

    /// Normalized base URL with leading and trailing slash ("/foo/" or "/")
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }
}

/// Ensure base URLs have a leading and trailing slash.
/// Absolute URLs (with a scheme) only get the trailing slash.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    if trimmed.contains("://") {
        let mut s = trimmed.to_string();
        if !s.ends_with('/') {
            s.push('/');
        }
        return s;
    }

    let mut s = trimmed.to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    if !s.ends_with('/') {
        s.push('/');
    }

    // Collapse duplicate slashes
    while s.contains("//") {
        s = s.replace("//", "/");
    }

    s
}
