//! End-to-end flows through the file-backed store
//!
//! These tests drive `Wiki` the way the pages do: fetch, filter, assemble.

use chrono::{Duration, TimeZone, Utc};
use parawiki_core::{
    Article, ArticleCriteria, ArticleDraft, ArticleId, CategoryFilter, CategoryId, Config,
    ContentStore, EmptyState, FileStore, MemoryStore, NewCategory, RequiredField, StoreError,
    Wiki, WikiData,
};
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> Config {
    let path = dir.join("parawiki.yml");
    std::fs::write(
        &path,
        "site:\n  title: Parallox\nlabels:\n  article_singular: article\n  article_plural: articles\n",
    )
    .unwrap();
    Config::from_file(&path).unwrap()
}

fn category(store: &FileStore, name: &str, order: i64) -> parawiki_core::Category {
    store
        .create_category(NewCategory {
            name: name.into(),
            color: "#10b981".into(),
            description: None,
            order,
        })
        .unwrap()
}

#[test]
fn test_browse_filters_and_joins() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let store = FileStore::from_config(&config).unwrap();
    let kingdoms = category(&store, "Reinos", 2);
    let heroes = category(&store, "Heróis", 1);
    let wiki = Wiki::new(store, config);

    for (title, cat, summary) in [
        ("Capital do Norte", &kingdoms, "A maior cidade"),
        ("Aria", &heroes, "Guardiã da cidade"),
        ("Deserto", &kingdoms, ""),
    ] {
        let draft = ArticleDraft::new()
            .with_title(title)
            .with_category(cat.id.clone())
            .with_content("<p>texto</p>")
            .with_summary(summary);
        wiki.save(None, &draft).unwrap();
    }

    let categories = wiki.categories().unwrap();
    assert_eq!(categories[0].name, "Heróis");

    // Search covers title and summary, case-insensitively
    let page = wiki
        .browse(&ArticleCriteria::new().with_search("CIDADE"))
        .unwrap();
    let listing = page.listing();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing.count_label, "2 articles");
    assert!(listing.articles.iter().all(|v| v.category.is_some()));

    let page = wiki
        .browse(
            &ArticleCriteria::new()
                .with_search("cidade")
                .with_category(CategoryFilter::Only(kingdoms.id.clone())),
        )
        .unwrap();
    let listing = page.listing();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing.articles[0].article.slug, "capital-do-norte");
    assert_eq!(listing.articles[0].badge(), Some(("Reinos", "#10b981")));

    let page = wiki
        .browse(&ArticleCriteria::new().with_search("dragão"))
        .unwrap();
    let listing = page.listing();
    assert_eq!(listing.count_label, "0 articles");
    assert_eq!(listing.empty_state, Some(EmptyState::NoMatches));

    let counts: Vec<(String, usize)> = wiki
        .overview()
        .unwrap()
        .category_counts()
        .into_iter()
        .map(|(c, n)| (c.name.clone(), n))
        .collect();
    assert_eq!(counts, vec![("Heróis".to_string(), 1), ("Reinos".to_string(), 2)]);
}

#[test]
fn test_saved_articles_survive_reopen() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let store = FileStore::from_config(&config).unwrap();
    let lore = category(&store, "Lore", 0);
    let wiki = Wiki::new(store, config.clone());

    let created = wiki
        .save(
            None,
            &ArticleDraft::new()
                .with_title("Ação & Reação")
                .with_category(lore.id.clone())
                .with_content("x"),
        )
        .unwrap();
    assert_eq!(created.slug, "acao-reacao");

    let reopened = Wiki::new(FileStore::from_config(&config).unwrap(), config);
    let page = reopened.article(&created.id).unwrap();
    assert_eq!(page.article, created);
    assert_eq!(page.category.as_ref().map(|c| c.name.as_str()), Some("Lore"));

    let category_page = reopened.category_page(&lore.id).unwrap();
    assert_eq!(category_page.listing().len(), 1);
}

#[test]
fn test_rejected_submissions_are_not_written() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let wiki = Wiki::new(FileStore::from_config(&config).unwrap(), config);

    let err = wiki.save(None, &ArticleDraft::new()).unwrap_err();
    match err {
        StoreError::Validation(e) => assert_eq!(e.missing, RequiredField::ALL.to_vec()),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!wiki.store().path().exists());

    let draft = ArticleDraft::new()
        .with_title("Duplo")
        .with_category("c")
        .with_content("x");
    wiki.save(None, &draft).unwrap();
    assert!(matches!(
        wiki.save(None, &draft),
        Err(StoreError::SlugTaken(slug)) if slug == "duplo"
    ));
    assert_eq!(
        wiki.store()
            .list_articles(
                &parawiki_core::ArticleFilter::any(),
                parawiki_core::SortKey::newest_first(),
                None
            )
            .unwrap()
            .len(),
        1
    );
}

fn seeded_article(n: i64, category: &CategoryId) -> Article {
    let base = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
    Article {
        id: ArticleId::new(format!("a{n}")),
        title: format!("Artigo {n}"),
        slug: format!("artigo-{n}"),
        category_id: category.clone(),
        summary: None,
        content: "x".into(),
        image_url: None,
        featured: false,
        published: true,
        created_date: base + Duration::hours(n),
        updated_date: None,
        views: 0,
    }
}

/// 130 published lore articles, then 40 newer ones elsewhere
fn crowded_store() -> (MemoryStore, CategoryId) {
    let mut data = WikiData::new();
    let lore = data.create_category(NewCategory {
        name: "Lore".into(),
        order: 0,
        ..NewCategory::default()
    });
    let other = data.create_category(NewCategory {
        name: "Outros".into(),
        order: 1,
        ..NewCategory::default()
    });

    for n in 0..130 {
        data.articles.push(seeded_article(n, &lore.id));
    }
    for n in 130..170 {
        data.articles.push(seeded_article(n, &other.id));
    }
    (MemoryStore::from_data(data), lore.id)
}

#[test]
fn test_category_page_lists_every_article() {
    let (store, lore) = crowded_store();
    let wiki = Wiki::new(store, Config::new("Parallox"));

    let page = wiki.category_page(&lore).unwrap();
    let listing = page.listing();
    assert_eq!(listing.len(), 130);
    assert_eq!(listing.count_label, "130 artigos");
    assert!(listing.articles.iter().all(|v| v.article.category_id == lore));

    let dates: Vec<_> = listing
        .articles
        .iter()
        .map(|v| v.article.created_date)
        .collect();
    assert!(dates.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(listing.articles[0].article.title, "Artigo 129");
    assert_eq!(listing.articles[129].article.title, "Artigo 0");
}

#[test]
fn test_category_page_limit_caps_newest() {
    let (store, lore) = crowded_store();
    let mut config = Config::new("Parallox");
    config.listing.category_page_limit = Some(100);
    let wiki = Wiki::new(store, config);

    let page = wiki.category_page(&lore).unwrap();
    let listing = page.listing();
    assert_eq!(listing.len(), 100);
    assert_eq!(listing.articles[0].article.title, "Artigo 129");
    assert_eq!(listing.articles[99].article.title, "Artigo 30");
}
