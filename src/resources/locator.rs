//! Resource name to content location mapping

use crate::error::ResourceResult;
use crate::resources::store::{ContentRef, ContentStore};
use std::sync::Arc;
use tracing::debug;

/// Maps resource names onto entries under a fixed base directory of a store
#[derive(Clone)]
pub struct ResourceLocator {
    base_dir: String,
    store: Arc<dyn ContentStore>,
}

impl ResourceLocator {
    /// Create a locator; surrounding slashes on `base_dir` are ignored
    pub fn new(base_dir: impl Into<String>, store: Arc<dyn ContentStore>) -> Self {
        let base_dir = base_dir.into().trim_matches('/').to_string();
        Self { base_dir, store }
    }

    /// Base directory inside the store
    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// Store-relative path for a resource name
    pub fn store_path(&self, name: &str) -> String {
        if self.base_dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.base_dir, name)
        }
    }

    /// Resolve a name (namespace prefix already stripped)
    ///
    /// Returns `Ok(None)` for unknown or unsafe names. Store failures other
    /// than "not there" are returned as retrieval errors.
    pub async fn locate(&self, name: &str) -> ResourceResult<Option<ContentRef>> {
        if !is_safe_name(name) {
            debug!("Rejected resource name {:?}", name);
            return Ok(None);
        }

        let path = self.store_path(name);
        if !self.store.exists(&path).await? {
            debug!("Resource {} not present in {} store", path, self.store.store_name());
            return Ok(None);
        }

        self.store.open(&path).await.map(Some)
    }
}

/// Check a resource name for traversal and other unsafe shapes
///
/// A safe name is relative, uses `/` separators, and every segment is a
/// plain, non-empty file or directory name.
pub fn is_safe_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('/') || name.contains('\\') || name.contains('\0') {
        return false;
    }

    name.split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
