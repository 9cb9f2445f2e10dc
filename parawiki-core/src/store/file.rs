use super::{
    new_record_id, ArticleFilter, AssetStore, ContentStore, NewCategory, StoreError, UploadedFile,
    WikiData,
};
use crate::config::Config;
use crate::models::{Article, ArticleDraft, Category};
use crate::query::SortKey;
use parawiki_types::{ArticleId, CategoryId};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};

/// Store backed by a single JSON document on disk.
///
/// The whole document is loaded on open and rewritten after every mutation.
/// A mutation only becomes visible in memory once the write succeeded.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    uploads_dir: PathBuf,
    uploads_url: String,
    data: RwLock<WikiData>,
}

impl FileStore {
    /// Open the data file, starting empty when it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            read_data(&path)?
        } else {
            tracing::debug!("No data file at {:?}, starting empty", path);
            WikiData::new()
        };

        let uploads_dir = path
            .parent()
            .map(|p| p.join("uploads"))
            .unwrap_or_else(|| PathBuf::from("uploads"));

        Ok(Self {
            path,
            uploads_dir,
            uploads_url: "/uploads/".to_string(),
            data: RwLock::new(data),
        })
    }

    /// Open the store described by a configuration
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let uploads_dir = config.uploads_dir();
        let dir_name = uploads_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("uploads")
            .to_string();
        let url = format!("{}{}/", config.normalized_base_url(), dir_name);
        Ok(Self::open(config.data_path())?.with_uploads(uploads_dir, url))
    }

    /// Where uploads are written and the URL prefix they are served under
    pub fn with_uploads(mut self, dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        self.uploads_dir = dir.into();
        self.uploads_url = url_prefix.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current document, creating the file if needed
    pub fn save(&self) -> Result<(), StoreError> {
        write_data(&self.path, &self.data.read())
    }

    pub fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        self.mutate(|data| Ok(data.create_category(new)))
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut WikiData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.data.write();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        write_data(&self.path, &next)?;
        *guard = next;
        Ok(out)
    }
}

fn read_data(path: &Path) -> Result<WikiData, StoreError> {
    let fetch_error = |reason: String| StoreError::Fetch {
        what: "wiki data",
        reason,
    };

    let contents = fs::read(path).map_err(|e| fetch_error(format!("{:?}: {}", path, e)))?;
    serde_json::from_slice(&contents).map_err(|e| fetch_error(format!("{:?}: {}", path, e)))
}

fn persist_error(path: &Path, err: impl std::fmt::Display) -> StoreError {
    StoreError::Persist(format!("{:?}: {}", path, err))
}

fn write_data(path: &Path, data: &WikiData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| persist_error(path, e))?;
    }

    let json = serde_json::to_vec_pretty(data).map_err(|e| persist_error(path, e))?;

    // Write next to the target and rename so readers never see half a file
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| persist_error(path, e))?;
    fs::rename(&tmp, path).map_err(|e| persist_error(path, e))?;

    tracing::debug!(
        "Saved {} categories and {} articles to {:?}",
        data.categories.len(),
        data.articles.len(),
        path
    );
    Ok(())
}

impl ContentStore for FileStore {
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
        self.mutate(|data| data.create_article(draft))
    }

    fn update_article(&self, id: &ArticleId, draft: &ArticleDraft) -> Result<Article, StoreError> {
        self.mutate(|data| data.update_article(id, draft))
    }

    fn delete_article(&self, id: &ArticleId) -> Result<(), StoreError> {
        self.mutate(|data| data.delete_article(id))
    }

    fn record_view(&self, id: &ArticleId) -> Result<u64, StoreError> {
        self.mutate(|data| data.record_view(id))
    }
}

impl AssetStore for FileStore {
    fn upload_file(&self, file_name: &str, bytes: &[u8]) -> Result<UploadedFile, StoreError> {
        let upload_error = |reason: String| StoreError::Upload {
            file: file_name.to_string(),
            reason,
        };

        // Only the final path component is kept
        let base_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| upload_error("invalid file name".to_string()))?;

        fs::create_dir_all(&self.uploads_dir).map_err(|e| upload_error(e.to_string()))?;

        let stored_name = format!("{}_{}", new_record_id(), base_name);
        let target = self.uploads_dir.join(&stored_name);
        fs::write(&target, bytes).map_err(|e| upload_error(e.to_string()))?;

        tracing::info!("Uploaded {} to {:?}", file_name, target);
        Ok(UploadedFile {
            url: format!("{}{}", self.uploads_url, stored_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn draft(title: &str) -> ArticleDraft {
        ArticleDraft::new()
            .with_title(title)
            .with_category("c1")
            .with_content("texto")
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("wiki.json")).unwrap();
        assert!(store
            .list_articles(&ArticleFilter::any(), SortKey::newest_first(), None)
            .unwrap()
            .is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_mutations_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("wiki.json");

        let store = FileStore::open(&path).unwrap();
        let category = store
            .create_category(NewCategory {
                name: "Heróis".into(),
                order: 2,
                ..NewCategory::default()
            })
            .unwrap();
        let mut article = store.create_article(&draft("Lenda")).unwrap();
        article.views = store.record_view(&article.id).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_article(&article.id).unwrap(), article);
        assert_eq!(reopened.get_category(&category.id).unwrap().name, "Heróis");
    }

    #[test]
    fn test_failed_mutation_leaves_data_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wiki.json");
        let store = FileStore::open(&path).unwrap();
        store.create_article(&draft("Lenda")).unwrap();

        assert!(matches!(
            store.create_article(&draft("Lenda")),
            Err(StoreError::SlugTaken(_))
        ));
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened
                .list_articles(&ArticleFilter::any(), SortKey::newest_first(), None)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_corrupt_file_is_fetch_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wiki.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Fetch { what: "wiki data", .. })
        ));
    }

    #[test]
    fn test_upload_writes_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("wiki.json"))
            .unwrap()
            .with_uploads(dir.path().join("media"), "/wiki/media/");

        let uploaded = store.upload_file("../../capa.png", b"png").unwrap();
        assert!(uploaded.url.starts_with("/wiki/media/"));
        assert!(uploaded.url.ends_with("_capa.png"));

        let stored = uploaded.url.trim_start_matches("/wiki/media/");
        assert_eq!(fs::read(dir.path().join("media").join(stored)).unwrap(), b"png");

        assert!(matches!(
            store.upload_file("", b"x"),
            Err(StoreError::Upload { .. })
        ));
    }
}
