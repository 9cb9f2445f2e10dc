use super::{
    new_record_id, ArticleFilter, AssetStore, ContentStore, NewCategory, StoreError, UploadedFile,
    WikiData,
};
use crate::models::{Article, ArticleDraft, Category};
use crate::query::SortKey;
use parawiki_types::{ArticleId, CategoryId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-process store, mainly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<WikiData>,
    uploads: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: WikiData) -> Self {
        Self {
            data: RwLock::new(data),
            uploads: RwLock::new(HashMap::new()),
        }
    }

    pub fn create_category(&self, new: NewCategory) -> Category {
        self.data.write().create_category(new)
    }

    /// Copy of the current document
    pub fn snapshot(&self) -> WikiData {
        self.data.read().clone()
    }

    /// Bytes previously uploaded under `url`
    pub fn uploaded(&self, url: &str) -> Option<Vec<u8>> {
        self.uploads.read().get(url).cloned()
    }
}

impl ContentStore for MemoryStore {
    fn list_categories(&self, sort: SortKey) -> Result<Vec<Category>, StoreError> {
        Ok(self.data.read().list_categories(sort))
    }

    fn get_category(&self, id: &CategoryId) -> Result<Category, StoreError> {
        self.data.read().get_category(id)
    }

    fn list_articles(
        &self,
        filter: &ArticleFilter,
        sort: SortKey,
        limit: Option<usize>,
    ) -> Result<Vec<Article>, StoreError> {
        Ok(self.data.read().list_articles(filter, sort, limit))
    }

    fn get_article(&self, id: &ArticleId) -> Result<Article, StoreError> {
        self.data.read().get_article(id)
    }

    fn create_article(&self, draft: &ArticleDraft) -> Result<Article, StoreError> {
        self.data.write().create_article(draft)
    }

    fn update_article(&self, id: &ArticleId, draft: &ArticleDraft) -> Result<Article, StoreError> {
        self.data.write().update_article(id, draft)
    }

    fn delete_article(&self, id: &ArticleId) -> Result<(), StoreError> {
        self.data.write().delete_article(id)
    }

    fn record_view(&self, id: &ArticleId) -> Result<u64, StoreError> {
        self.data.write().record_view(id)
    }
}

impl AssetStore for MemoryStore {
    fn upload_file(&self, file_name: &str, bytes: &[u8]) -> Result<UploadedFile, StoreError> {
        if file_name.trim().is_empty() {
            return Err(StoreError::Upload {
                file: file_name.to_string(),
                reason: "empty file name".to_string(),
            });
        }

        let url = format!("memory://uploads/{}_{}", new_record_id(), file_name);
        self.uploads.write().insert(url.clone(), bytes.to_vec());
        Ok(UploadedFile { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_trait() {
        let store = MemoryStore::new();
        let category = store.create_category(NewCategory {
            name: "Reinos".into(),
            color: "#10b981".into(),
            description: None,
            order: 1,
        });

        let draft = ArticleDraft::new()
            .with_title("Capital")
            .with_category(category.id.clone())
            .with_content("texto");
        let created = store.create_article(&draft).unwrap();

        assert_eq!(store.get_article(&created.id).unwrap(), created);
        assert_eq!(store.get_category(&category.id).unwrap(), category);
        assert_eq!(store.snapshot().articles.len(), 1);

        assert_eq!(store.record_view(&created.id).unwrap(), 1);
        assert_eq!(store.get_article(&created.id).unwrap().views, 1);

        store.delete_article(&created.id).unwrap();
        assert!(store.get_article(&created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_upload_keeps_bytes() {
        let store = MemoryStore::new();
        let uploaded = store.upload_file("capa.png", b"png").unwrap();
        assert!(uploaded.url.ends_with("_capa.png"));
        assert_eq!(store.uploaded(&uploaded.url), Some(b"png".to_vec()));

        assert!(matches!(
            store.upload_file(" ", b"x"),
            Err(StoreError::Upload { .. })
        ));
    }
}
