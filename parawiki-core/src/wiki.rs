//! Page-level operations: fetch collections from the store, then filter and
//! assemble them for display.

use crate::config::Config;
use crate::models::{Article, ArticleDraft, Category};
use crate::query::{filter_articles, ArticleCriteria, CategoryFilter, SortKey};
use crate::store::{ArticleFilter, AssetStore, ContentStore, StoreError, UploadedFile};
use crate::validation::validate_submission;
use crate::view::{self, ArticleView, CategoryIndex, Listing, Pluralization};
use parawiki_types::{ArticleId, CategoryId};
use std::slice;

/// The wiki as seen by its pages
pub struct Wiki<S> {
    store: S,
    config: Config,
}

/// Data behind the "all articles" page
#[derive(Debug, Clone)]
pub struct BrowsePage {
    pub categories: Vec<Category>,
    pub articles: Vec<Article>,
    pub criteria: ArticleCriteria,
    plural: Pluralization,
}

impl BrowsePage {
    pub fn listing(&self) -> Listing<'_> {
        Listing::assemble(&self.articles, &self.categories, &self.criteria, &self.plural)
    }
}

/// Data behind a category page
#[derive(Debug, Clone)]
pub struct CategoryPage {
    pub category: Category,
    pub articles: Vec<Article>,
    plural: Pluralization,
}

impl CategoryPage {
    pub fn listing(&self) -> Listing<'_> {
        let criteria = ArticleCriteria::category_page(self.category.id.clone());
        let index = CategoryIndex::new(slice::from_ref(&self.category));
        let views = index.attach_all(filter_articles(&self.articles, &criteria));
        // An empty category reads as "nothing here yet", not as a failed search
        Listing::from_views(views, false, &self.plural)
    }
}

/// A single article with its category, if it still exists
#[derive(Debug, Clone)]
pub struct ArticlePage {
    pub article: Article,
    pub category: Option<Category>,
}

impl ArticlePage {
    pub fn view(&self) -> ArticleView<'_> {
        ArticleView::new(&self.article, self.category.as_ref())
    }
}

/// Published articles and categories for overview screens
#[derive(Debug, Clone)]
pub struct Overview {
    pub categories: Vec<Category>,
    pub articles: Vec<Article>,
}

impl Overview {
    pub fn featured(&self) -> Vec<&Article> {
        view::featured(&self.articles)
    }

    pub fn most_recent(&self) -> Option<&Article> {
        view::most_recent(&self.articles)
    }

    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        view::category_counts(&self.articles, &self.categories)
    }
}

impl<S: ContentStore> Wiki<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn plural(&self) -> Pluralization {
        self.config.labels.article_count()
    }

    /// Categories in display order
    pub fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.store.list_categories(SortKey::by_order())
    }

    /// Published articles, newest first, with categories in display order
    pub fn overview(&self) -> Result<Overview, StoreError> {
        let categories = self.categories()?;
        let articles =
            self.store
                .list_articles(&ArticleFilter::published(), SortKey::newest_first(), None)?;
        Ok(Overview {
            categories,
            articles,
        })
    }

    /// The "all articles" listing for the given criteria.
    ///
    /// Publication state and category are narrowed by the store, so
    /// `listing.browse_limit` counts only articles of the selected category.
    /// The limit is applied before the search text is matched.
    pub fn browse(&self, criteria: &ArticleCriteria) -> Result<BrowsePage, StoreError> {
        let mut filter = if criteria.published_only {
            ArticleFilter::published()
        } else {
            ArticleFilter::any()
        };
        if let CategoryFilter::Only(id) = &criteria.category {
            filter = filter.in_category(id.clone());
        }

        let categories = self.categories()?;
        let articles = self.store.list_articles(
            &filter,
            SortKey::newest_first(),
            self.config.listing.browse_limit,
        )?;

        tracing::debug!("Fetched {} articles for browsing", articles.len());

        Ok(BrowsePage {
            categories,
            articles,
            criteria: criteria.clone(),
            plural: self.plural(),
        })
    }

    /// Published articles of one category, newest first.
    ///
    /// Fails with `NotFound` when the category does not exist.
    pub fn category_page(&self, id: &CategoryId) -> Result<CategoryPage, StoreError> {
        let category = self.store.get_category(id)?;
        let filter = ArticleFilter::published().in_category(id.clone());
        let articles = self.store.list_articles(
            &filter,
            SortKey::newest_first(),
            self.config.listing.category_page_limit,
        )?;

        Ok(CategoryPage {
            category,
            articles,
            plural: self.plural(),
        })
    }

    /// A single article by id, published or not
    pub fn article(&self, id: &ArticleId) -> Result<ArticlePage, StoreError> {
        let article = self.store.get_article(id)?;

        let category = if article.has_category() {
            match self.store.get_category(&article.category_id) {
                Ok(category) => Some(category),
                Err(err) if err.is_not_found() => {
                    tracing::warn!(
                        "Article {} references missing category {}",
                        article.id,
                        article.category_id
                    );
                    None
                }
                Err(err) => return Err(err),
            }
        } else {
            None
        };

        Ok(ArticlePage { article, category })
    }

    /// Count a read of an article
    pub fn record_view(&self, id: &ArticleId) -> Result<u64, StoreError> {
        let views = self.store.record_view(id)?;
        tracing::debug!("Article {} now has {} views", id, views);
        Ok(views)
    }

    /// Everything `save` would reject, checked without writing: missing
    /// fields, an unknown `existing` id, a slug owned by another article.
    ///
    /// Run it before side effects such as uploads so a rejected submission
    /// leaves nothing behind.
    pub fn check_submission(
        &self,
        existing: Option<&ArticleId>,
        draft: &ArticleDraft,
    ) -> Result<(), StoreError> {
        validate_submission(draft)?;

        if let Some(id) = existing {
            self.store.get_article(id)?;
        }

        let taken = self
            .store
            .list_articles(&ArticleFilter::any(), SortKey::newest_first(), None)?
            .iter()
            .any(|a| a.slug == draft.slug && Some(&a.id) != existing);
        if taken {
            return Err(StoreError::SlugTaken(draft.slug.clone()));
        }

        Ok(())
    }

    /// Validate a draft and create it, or update `existing` when given.
    ///
    /// An invalid draft never reaches the store.
    pub fn save(
        &self,
        existing: Option<&ArticleId>,
        draft: &ArticleDraft,
    ) -> Result<Article, StoreError> {
        validate_submission(draft)?;

        let article = match existing {
            Some(id) => self.store.update_article(id, draft)?,
            None => self.store.create_article(draft)?,
        };

        tracing::info!(
            "{} article {} ({})",
            if existing.is_some() { "Updated" } else { "Created" },
            article.id,
            article.slug
        );
        Ok(article)
    }

    pub fn delete(&self, id: &ArticleId) -> Result<(), StoreError> {
        self.store.delete_article(id)?;
        tracing::info!("Deleted article {}", id);
        Ok(())
    }
}

/// Upload a cover image and point the draft at it.
///
/// On failure the draft's `image_url` is left as it was.
pub fn attach_image<A: AssetStore + ?Sized>(
    assets: &A,
    draft: &mut ArticleDraft,
    file_name: &str,
    bytes: &[u8],
) -> Result<UploadedFile, StoreError> {
    let uploaded = assets.upload_file(file_name, bytes)?;
    draft.image_url = uploaded.url.clone();
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewCategory};
    use crate::validation::RequiredField;
    use crate::view::EmptyState;
    use chrono::{Duration, TimeZone, Utc};

    fn wiki() -> (Wiki<MemoryStore>, Category) {
        let store = MemoryStore::new();
        let category = store.create_category(NewCategory {
            name: "Reinos".into(),
            color: "#10b981".into(),
            description: Some("Terras conhecidas".into()),
            order: 1,
        });
        (Wiki::new(store, Config::new("Parallox")), category)
    }

    fn draft(title: &str, category: &Category) -> ArticleDraft {
        ArticleDraft::new()
            .with_title(title)
            .with_category(category.id.clone())
            .with_content("<p>texto</p>")
    }

    #[test]
    fn test_invalid_draft_never_reaches_store() {
        let (wiki, _) = wiki();
        let err = wiki.save(None, &ArticleDraft::new().with_title("Sem corpo")).unwrap_err();

        match err {
            StoreError::Validation(e) => {
                assert_eq!(e.missing, vec![RequiredField::CategoryId, RequiredField::Content])
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(wiki.store().snapshot().articles.is_empty());
    }

    #[test]
    fn test_save_creates_then_updates() {
        let (wiki, category) = wiki();
        let created = wiki.save(None, &draft("Capital", &category)).unwrap();

        let mut edit = ArticleDraft::from(&created);
        edit.summary = "A maior cidade".into();
        let updated = wiki.save(Some(&created.id), &edit).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.summary.as_deref(), Some("A maior cidade"));
        assert_eq!(wiki.store().snapshot().articles.len(), 1);
        assert_eq!(wiki.record_view(&created.id).unwrap(), 1);
    }

    #[test]
    fn test_browse_hides_drafts() {
        let (wiki, category) = wiki();
        wiki.save(None, &draft("Publicado", &category)).unwrap();
        let mut hidden = draft("Rascunho", &category);
        hidden.published = false;
        wiki.save(None, &hidden).unwrap();

        let page = wiki.browse(&ArticleCriteria::new()).unwrap();
        let listing = page.listing();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.articles[0].article.title, "Publicado");
        assert_eq!(listing.count_label, "1 artigo");

        let page = wiki
            .browse(&ArticleCriteria::new().with_published_only(false))
            .unwrap();
        assert_eq!(page.listing().len(), 2);
    }

    #[test]
    fn test_category_page() {
        let (wiki, category) = wiki();
        wiki.save(None, &draft("Norte", &category)).unwrap();

        let page = wiki.category_page(&category.id).unwrap();
        let listing = page.listing();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.articles[0].category.map(|c| &c.id), Some(&category.id));

        let err = wiki.category_page(&CategoryId::new("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_category_page() {
        let (wiki, category) = wiki();
        let page = wiki.category_page(&category.id).unwrap();
        let listing = page.listing();
        assert!(listing.is_empty());
        assert_eq!(listing.count_label, "0 artigos");
        assert_eq!(listing.empty_state, Some(EmptyState::NoArticlesYet));
    }

    #[test]
    fn test_article_with_dangling_category() {
        let (wiki, _) = wiki();
        let orphan = ArticleDraft::new()
            .with_title("Órfão")
            .with_category("gone")
            .with_content("x");
        let created = wiki.save(None, &orphan).unwrap();

        let page = wiki.article(&created.id).unwrap();
        assert!(page.view().is_uncategorized());

        assert!(wiki.article(&ArticleId::new("nope")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_overview() {
        let (wiki, category) = wiki();
        let mut star = draft("Estrela", &category);
        star.featured = true;
        wiki.save(None, &star).unwrap();
        wiki.save(None, &draft("Comum", &category)).unwrap();

        let overview = wiki.overview().unwrap();
        assert_eq!(overview.featured().len(), 1);
        assert!(overview.most_recent().is_some());
        assert_eq!(overview.category_counts()[0].1, 2);
    }

    #[test]
    fn test_check_submission() {
        let (wiki, category) = wiki();
        let first = wiki.save(None, &draft("Norte", &category)).unwrap();

        assert!(wiki.check_submission(None, &draft("Sul", &category)).is_ok());
        assert!(wiki.check_submission(Some(&first.id), &draft("Norte", &category)).is_ok());
        assert!(matches!(
            wiki.check_submission(None, &draft("Norte", &category)),
            Err(StoreError::SlugTaken(slug)) if slug == "norte"
        ));
        assert!(matches!(
            wiki.check_submission(None, &ArticleDraft::new()),
            Err(StoreError::Validation(_))
        ));
        assert!(wiki
            .check_submission(Some(&ArticleId::new("gone")), &draft("Leste", &category))
            .unwrap_err()
            .is_not_found());
        assert_eq!(wiki.store().snapshot().articles.len(), 1);
    }

    #[test]
    fn test_browse_limit_counts_selected_category_only() {
        let (wiki, kingdoms) = wiki();
        let heroes = wiki.store().create_category(NewCategory {
            name: "Heróis".into(),
            ..NewCategory::default()
        });

        // Three older kingdom articles, five newer hero articles
        let mut data = wiki.store().snapshot();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for n in 0..8i64 {
            let category = if n < 3 { &kingdoms } else { &heroes };
            let mut article = data
                .create_article(&draft(&format!("Artigo {n}"), category))
                .unwrap();
            article.created_date = base + Duration::days(n);
            let stored = data.articles.iter_mut().find(|a| a.id == article.id).unwrap();
            *stored = article;
        }

        let mut config = Config::new("Parallox");
        config.listing.browse_limit = Some(3);
        let wiki = Wiki::new(MemoryStore::from_data(data), config);

        let criteria =
            ArticleCriteria::new().with_category(CategoryFilter::Only(kingdoms.id.clone()));
        let page = wiki.browse(&criteria).unwrap();
        let titles: Vec<&str> = page
            .listing()
            .articles
            .iter()
            .map(|v| v.article.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Artigo 2", "Artigo 1", "Artigo 0"]);

        let page = wiki.browse(&ArticleCriteria::new()).unwrap();
        assert!(page.listing().articles.iter().all(|v| v.article.has_category()));
        assert_eq!(page.listing().len(), 3);
    }

    struct BrokenUploads;

    impl AssetStore for BrokenUploads {
        fn upload_file(&self, file_name: &str, _bytes: &[u8]) -> Result<UploadedFile, StoreError> {
            Err(StoreError::Upload {
                file: file_name.to_string(),
                reason: "disk full".into(),
            })
        }
    }

    #[test]
    fn test_failed_upload_keeps_image_url() {
        let mut draft = ArticleDraft {
            image_url: "/uploads/old.png".into(),
            ..ArticleDraft::default()
        };

        assert!(attach_image(&BrokenUploads, &mut draft, "new.png", b"x").is_err());
        assert_eq!(draft.image_url, "/uploads/old.png");

        let store = MemoryStore::new();
        let uploaded = attach_image(&store, &mut draft, "new.png", b"x").unwrap();
        assert_eq!(draft.image_url, uploaded.url);
    }
}
