//! Backing content stores
//!
//! A store answers existence checks and hands out content references for
//! store-relative paths such as `resources/web/app.css`. Bytes are only
//! read when a response body is actually needed.

use crate::error::{ResourceError, ResourceResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Opaque reference to a piece of content inside a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    path: String,
    location: String,
}

impl ContentRef {
    /// Create a content reference
    pub fn new(path: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            location: location.into(),
        }
    }

    /// Store-relative path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Displayable location (`file://...`, `memory:...`)
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Abstract content store interface
///
/// Implemented by the on-disk bundle layout and by in-memory entry sets.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Check whether a regular entry exists at `path`
    async fn exists(&self, path: &str) -> ResourceResult<bool>;

    /// Resolve `path` to a content reference
    async fn open(&self, path: &str) -> ResourceResult<ContentRef>;

    /// Read the full content behind a reference
    async fn read(&self, content: &ContentRef) -> ResourceResult<Vec<u8>>;

    /// Human-readable store name for display
    fn store_name(&self) -> &'static str;
}

/// Store backed by an unpacked bundle directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at an existing directory
    pub fn new(root: impl Into<PathBuf>) -> ResourceResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ResourceError::BundleNotFound(root));
        }
        Ok(Self { root })
    }

    /// Bundle root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl ContentStore for DirectoryStore {
    // Symlinks are never followed, so an entry is servable exactly when the
    // inventory walk lists it.
    async fn exists(&self, path: &str) -> ResourceResult<bool> {
        let mut current = self.root.clone();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = segments.into_iter().peekable();

        while let Some(segment) = segments.next() {
            current.push(segment);
            let file_type = match fs::symlink_metadata(&current).await {
                Ok(meta) => meta.file_type(),
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
                Err(e) => return Err(ResourceError::retrieval(path, e)),
            };

            if file_type.is_symlink() {
                return Ok(false);
            }
            if segments.peek().is_none() {
                return Ok(file_type.is_file());
            }
            if !file_type.is_dir() {
                return Ok(false);
            }
        }
        Ok(false)
    }

    async fn open(&self, path: &str) -> ResourceResult<ContentRef> {
        let full = self.full_path(path);
        Ok(ContentRef::new(path, format!("file://{}", full.display())))
    }

    async fn read(&self, content: &ContentRef) -> ResourceResult<Vec<u8>> {
        fs::read(self.full_path(content.path()))
            .await
            .map_err(|e| ResourceError::retrieval(content.path(), e))
    }

    fn store_name(&self) -> &'static str {
        "directory"
    }
}

/// Store holding embedded entries in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style)
    pub fn with_entry(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace an entry
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), content.into());
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn exists(&self, path: &str) -> ResourceResult<bool> {
        Ok(self.entries.contains_key(path))
    }

    async fn open(&self, path: &str) -> ResourceResult<ContentRef> {
        Ok(ContentRef::new(path, format!("memory:{}", path)))
    }

    async fn read(&self, content: &ContentRef) -> ResourceResult<Vec<u8>> {
        self.entries.get(content.path()).cloned().ok_or_else(|| {
            ResourceError::retrieval(
                content.path(),
                std::io::Error::new(ErrorKind::NotFound, "entry not in memory store"),
            )
        })
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn directory_store_requires_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = DirectoryStore::new(&missing).unwrap_err();
        assert!(matches!(err, ResourceError::BundleNotFound(_)));
    }

    #[tokio::test]
    async fn directory_store_exists_and_reads() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("resources/web")).unwrap();
        std::fs::write(temp.path().join("resources/web/app.css"), "body{}").unwrap();

        let store = DirectoryStore::new(temp.path()).unwrap();
        assert!(store.exists("resources/web/app.css").await.unwrap());
        assert!(!store.exists("resources/web/other.css").await.unwrap());
        // directories are not entries
        assert!(!store.exists("resources/web").await.unwrap());

        let content = store.open("resources/web/app.css").await.unwrap();
        assert!(content.location().starts_with("file://"));
        assert_eq!(store.read(&content).await.unwrap(), b"body{}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn directory_store_ignores_symlinks() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "hidden").unwrap();

        let temp = TempDir::new().unwrap();
        let web = temp.path().join("resources/web");
        std::fs::create_dir_all(&web).unwrap();
        symlink(outside.path().join("secret.txt"), web.join("secret.txt")).unwrap();
        symlink(outside.path(), web.join("linked")).unwrap();

        let store = DirectoryStore::new(temp.path()).unwrap();
        assert!(!store.exists("resources/web/secret.txt").await.unwrap());
        assert!(!store.exists("resources/web/linked/secret.txt").await.unwrap());

        let listed = crate::bundle::scan_resources(temp.path(), "resources/web").unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn directory_store_read_failure_is_retrieval() {
        let temp = TempDir::new().unwrap();
        let store = DirectoryStore::new(temp.path()).unwrap();
        let content = store.open("resources/web/gone.js").await.unwrap();

        let err = store.read(&content).await.unwrap_err();
        assert!(matches!(err, ResourceError::Retrieval { .. }));
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new().with_entry("resources/web/app.js", "alert(1)");
        assert!(store.exists("resources/web/app.js").await.unwrap());
        assert!(!store.exists("resources/web/app.css").await.unwrap());

        let content = store.open("resources/web/app.js").await.unwrap();
        assert_eq!(content.location(), "memory:resources/web/app.js");
        assert_eq!(store.read(&content).await.unwrap(), b"alert(1)");
    }
}
