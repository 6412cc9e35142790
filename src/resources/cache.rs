//! In-memory resource handle cache
//!
//! Handles are created lazily on first lookup and kept for the lifetime of
//! the owning service. Nothing is ever evicted.

use crate::resources::store::ContentRef;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Cache behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Memoize handles; when off every lookup builds a fresh handle
    pub enabled: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A resolved resource, immutable once created
#[derive(Debug)]
pub struct ResourceHandle {
    name: String,
    content: ContentRef,
    content_type: String,
}

impl ResourceHandle {
    /// Create a handle, guessing the content type from the name
    pub fn new(name: impl Into<String>, content: ContentRef) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        Self {
            name,
            content,
            content_type,
        }
    }

    /// Resource name (without namespace prefix)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing content reference
    pub fn content(&self) -> &ContentRef {
        &self.content
    }

    /// MIME type
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Append-only map of resource name to handle
///
/// The map is sharded, so first lookups of different names only contend
/// when they hash to the same shard.
#[derive(Debug, Default)]
pub struct ResourceCache {
    options: CacheOptions,
    entries: DashMap<String, Arc<ResourceHandle>>,
}

impl ResourceCache {
    /// Create an empty cache
    pub fn new(options: CacheOptions) -> Self {
        Self {
            options,
            entries: DashMap::new(),
        }
    }

    /// Whether handles are memoized
    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Return the handle for `name`, creating it from `factory` on a miss
    ///
    /// With caching enabled the factory runs at most once per name, even
    /// when several threads miss at the same time: it runs under the
    /// shard's write lock.
    pub fn get_or_create<F>(&self, name: &str, factory: F) -> Arc<ResourceHandle>
    where
        F: FnOnce() -> ContentRef,
    {
        if !self.options.enabled {
            return Arc::new(ResourceHandle::new(name, factory()));
        }

        if let Some(existing) = self.entries.get(name) {
            return Arc::clone(existing.value());
        }

        let entry = self.entries.entry(name.to_string()).or_insert_with(|| {
            debug!("Caching resource handle for {}", name);
            Arc::new(ResourceHandle::new(name, factory()))
        });
        Arc::clone(entry.value())
    }

    /// Check whether a handle is cached for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of cached handles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handle has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
