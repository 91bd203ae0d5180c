//! Persisted snapshot of recently accessed pages

use crate::error::{CacheError, Result};
use crate::page::Page;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Well-known storage key of the snapshot
pub const CACHE_FILE_NAME: &str = "cachedPages.json";

/// Single-slot page cache backed by a JSON file
#[derive(Debug, Clone)]
pub struct PageCache {
    path: PathBuf,
}

impl PageCache {
    /// Create a cache stored at an explicit file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a cache inside `dir`, using the well-known file name
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(CACHE_FILE_NAME))
    }

    /// Get the default cache directory
    pub fn default_cache_dir() -> PathBuf {
        let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("scrap");
        path
    }

    /// Path of the persisted snapshot
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. Absent, unreadable or malformed storage yields an empty list.
    pub async fn load(&self) -> Vec<Page> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No page cache at {}", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read page cache {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Page>>(&content) {
            Ok(pages) => {
                debug!("Loaded {} cached pages", pages.len());
                pages
            }
            Err(e) => {
                warn!("Ignoring malformed page cache {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Overwrite the snapshot. Readers never observe a partial write.
    pub async fn save(&self, pages: &[Page]) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string(pages)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, content).await?;
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(CacheError::WriteFailed {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
            .into());
        }

        debug!("Saved {} pages to {}", pages.len(), self.path.display());
        Ok(())
    }

    /// Remove the persisted snapshot
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::in_dir(Self::default_cache_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pages() -> Vec<Page> {
        vec![
            Page::new("1", "Hello World")
                .with_lines(vec!["Hello World".to_string(), "body".to_string()]),
            Page::new("2", "Goodbye"),
        ]
    }

    #[tokio::test]
    async fn test_cache_save_load() {
        let temp_dir = tempdir().unwrap();
        let cache = PageCache::in_dir(temp_dir.path());

        cache.save(&pages()).await.unwrap();

        assert_eq!(cache.load().await, pages());
        assert!(!cache.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_cache_save_creates_directory_and_overwrites() {
        let temp_dir = tempdir().unwrap();
        let cache = PageCache::in_dir(temp_dir.path().join("nested").join("scrap"));

        cache.save(&pages()).await.unwrap();
        cache.save(&[Page::new("9", "Only")]).await.unwrap();

        assert_eq!(cache.load().await, vec![Page::new("9", "Only")]);
    }

    #[tokio::test]
    async fn test_cache_load_nonexistent() {
        let temp_dir = tempdir().unwrap();
        let cache = PageCache::in_dir(temp_dir.path());

        assert!(cache.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_cache_load_malformed() {
        let temp_dir = tempdir().unwrap();
        let cache = PageCache::in_dir(temp_dir.path());

        tokio::fs::write(cache.path(), "{not json").await.unwrap();
        assert!(cache.load().await.is_empty());

        tokio::fs::write(cache.path(), r#"{"pages": []}"#).await.unwrap();
        assert!(cache.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let temp_dir = tempdir().unwrap();
        let cache = PageCache::in_dir(temp_dir.path());

        cache.clear().await.unwrap();
        cache.save(&pages()).await.unwrap();
        cache.clear().await.unwrap();

        assert!(cache.load().await.is_empty());
    }
}
