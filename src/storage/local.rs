//! Local filesystem storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{PostedSet, RecipeId};
use crate::storage::PostedStore;

/// Posted set kept in a plain newline-delimited text file.
#[derive(Debug, Clone)]
pub struct LocalPostedStore {
    path: PathBuf,
}

impl LocalPostedStore {
    /// Create a store backed by the given file. The file does not need to exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Read the file, returning None if it doesn't exist.
    async fn read_text(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// True when the file is non-empty and its last byte is not a newline.
    async fn needs_leading_newline(&self) -> Result<bool> {
        Ok(self
            .read_text()
            .await?
            .is_some_and(|text| !text.is_empty() && !text.ends_with('\n')))
    }
}

#[async_trait]
impl PostedStore for LocalPostedStore {
    async fn load(&self) -> Result<PostedSet> {
        match self.read_text().await? {
            Some(text) => Ok(PostedSet::from_lines(&text)),
            None => {
                log::debug!("No posted file at {}, starting empty", self.path.display());
                Ok(PostedSet::new())
            }
        }
    }

    async fn append(&self, id: &RecipeId) -> Result<()> {
        self.ensure_dir().await?;

        let mut line = String::new();
        if self.needs_leading_newline().await? {
            line.push('\n');
        }
        line.push_str(id.as_str());
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalPostedStore::new(tmp.path().join("posted_recipes.txt"));

        let set = store.load().await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn append_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = LocalPostedStore::new(tmp.path().join("nested/dir/posted.txt"));

        store.append(&RecipeId::from("https://c/1")).await.unwrap();
        store.append(&RecipeId::from("https://c/2")).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "https://c/1\nhttps://c/2\n");

        let set = store.load().await.unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&RecipeId::from("https://c/2")));
    }

    #[tokio::test]
    async fn append_preserves_existing_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("posted.txt");
        // Written by hand, no trailing newline
        std::fs::write(&path, "https://c/old1\nhttps://c/old2").unwrap();

        let store = LocalPostedStore::new(&path);
        store.append(&RecipeId::from("https://c/new")).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "https://c/old1\nhttps://c/old2\nhttps://c/new\n");

        let ids: Vec<String> = store
            .load()
            .await
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, vec!["https://c/old1", "https://c/old2", "https://c/new"]);
    }

    #[tokio::test]
    async fn load_fails_when_path_is_a_directory() {
        let tmp = TempDir::new().unwrap();
        let store = LocalPostedStore::new(tmp.path());

        assert!(store.load().await.is_err());
    }
}
