//! Request dispatch for namespaced resource paths

use crate::config::Config;
use crate::error::{ResourceError, ResourceResult};
use crate::resources::cache::{CacheOptions, ResourceCache, ResourceHandle};
use crate::resources::conditional;
use crate::resources::freshness::{FreshnessOracle, Watermark};
use crate::resources::locator::ResourceLocator;
use crate::resources::store::{ContentStore, DirectoryStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Settings a [`ResourceService`] is built from
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Namespace; the routing prefix is `.<namespace>`
    pub namespace: String,
    /// Directory inside the store holding the resources
    pub base_dir: String,
    /// Handle caching
    pub cache: CacheOptions,
    /// Bundle-wide last-modified time
    pub watermark: Watermark,
}

impl ServiceOptions {
    /// Options with default layout for a namespace and watermark
    pub fn new(namespace: impl Into<String>, watermark: Watermark) -> Self {
        Self {
            namespace: namespace.into(),
            base_dir: "resources/web".to_string(),
            cache: CacheOptions::default(),
            watermark,
        }
    }

    /// Override the base directory
    pub fn with_base_dir(mut self, base_dir: impl Into<String>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Override cache options
    pub fn with_cache(mut self, cache: CacheOptions) -> Self {
        self.cache = cache;
        self
    }
}

/// Inbound request, already extracted from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Namespaced path, e.g. `.notesin9/app.css`
    pub path: String,
    /// Timestamp of the client's cached copy, in epoch millis
    pub conditional_timestamp: Option<i64>,
}

impl ResourceRequest {
    /// Unconditional request
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conditional_timestamp: None,
        }
    }

    /// Attach a client timestamp
    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.conditional_timestamp = Some(millis);
        self
    }

    /// Attach an `If-Modified-Since` header; garbled values are dropped
    pub fn with_if_modified_since(mut self, header: &str) -> Self {
        self.conditional_timestamp = conditional::parse_if_modified_since(header);
        self
    }
}

/// Outcome of dispatching a request
#[derive(Debug, Clone)]
pub enum ResourceResponse {
    /// Outside the namespace, unsafe, or not in the bundle
    NotFound,
    /// Client copy is current
    NotModified,
    /// Serve the resource
    Content {
        handle: Arc<ResourceHandle>,
        last_modified: i64,
    },
}

impl ResourceResponse {
    /// Equivalent HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::NotModified => 304,
            Self::Content { .. } => 200,
        }
    }

    /// Whether a body should be sent
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content { .. })
    }
}

/// Serves namespaced resources from a content store
///
/// Build one per bundle at startup and share it (`Arc`) between request
/// handlers; the handle cache lives exactly as long as the service.
pub struct ResourceService {
    prefix: String,
    locator: ResourceLocator,
    store: Arc<dyn ContentStore>,
    cache: ResourceCache,
    oracle: FreshnessOracle,
}

impl ResourceService {
    /// Create a service over a store
    pub fn new(options: ServiceOptions, store: Arc<dyn ContentStore>) -> ResourceResult<Self> {
        validate_namespace(&options.namespace)?;

        Ok(Self {
            prefix: format!(".{}", options.namespace),
            locator: ResourceLocator::new(options.base_dir, Arc::clone(&store)),
            store,
            cache: ResourceCache::new(options.cache),
            oracle: FreshnessOracle::new(options.watermark),
        })
    }

    /// Create a service over the on-disk bundle named in the config
    pub async fn from_config(config: &Config) -> ResourceResult<Self> {
        let root = &config.bundle.root;
        let store = DirectoryStore::new(root)?;

        let watermark = match config.bundle.last_modified {
            Some(millis) => Watermark::from_millis(millis),
            None => Watermark::of_bundle(root).await,
        };

        let options = ServiceOptions::new(config.resources.namespace.clone(), watermark)
            .with_base_dir(config.resources.base_dir.clone())
            .with_cache(CacheOptions {
                enabled: config.cache.enabled,
            });

        Self::new(options, Arc::new(store))
    }

    /// Routing prefix, e.g. `.notesin9`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Bundle-wide watermark
    pub fn watermark(&self) -> Watermark {
        self.oracle.watermark()
    }

    /// Handle cache
    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Strip `<prefix>/` from a request path
    pub fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())?.strip_prefix('/')
    }

    /// Dispatch a request
    pub async fn handle(&self, request: &ResourceRequest) -> ResourceResult<ResourceResponse> {
        let Some(name) = self.strip_prefix(&request.path) else {
            debug!("Path {} is outside {}", request.path, self.prefix);
            return Ok(ResourceResponse::NotFound);
        };

        let content = match self.locator.locate(name).await {
            Ok(Some(content)) => content,
            Ok(None) => return Ok(ResourceResponse::NotFound),
            Err(e) => {
                warn!("Failed to locate {}: {}", name, e);
                return Err(e);
            }
        };

        let handle = self.cache.get_or_create(name, || content);

        let client_timestamp = request.conditional_timestamp.unwrap_or(i64::MIN);
        if !self.oracle.is_stale(client_timestamp) {
            debug!("{} not modified since {}", name, client_timestamp);
            return Ok(ResourceResponse::NotModified);
        }

        Ok(ResourceResponse::Content {
            handle,
            last_modified: self.oracle.watermark().millis(),
        })
    }

    /// Read the bytes behind a handle
    pub async fn read(&self, handle: &ResourceHandle) -> ResourceResult<Vec<u8>> {
        self.store.read(handle.content()).await.inspect_err(|e| {
            warn!("Failed to read {}: {}", handle.name(), e);
        })
    }
}

/// Check that a namespace can be used as a single path segment
pub fn validate_namespace(namespace: &str) -> ResourceResult<()> {
    let invalid = |reason: &str| ResourceError::NamespaceInvalid {
        namespace: namespace.to_string(),
        reason: reason.to_string(),
    };

    if namespace.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if namespace.starts_with('.') {
        return Err(invalid("the leading '.' is added automatically"));
    }
    if !namespace
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(invalid("only ASCII letters, digits, '-', '_' and '.' are allowed"));
    }
    Ok(())
}
