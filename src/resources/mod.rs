//! Bundle resource serving with last-modified revalidation
//!
//! Static files (CSS, JS, images) live under a fixed directory of the
//! bundle and are requested under a namespace prefix such as `.notesin9/`.
//! Resolved handles are memoized for the life of the service, and clients
//! revalidate against one bundle-wide watermark.
//!
//! # Request Flow
//!
//! | Step | Component | Outcome on failure |
//! |------|-----------|--------------------|
//! | Strip prefix | [`ResourceService`] | NotFound |
//! | Map name to entry | [`ResourceLocator`] | NotFound (unknown or unsafe name) |
//! | Memoize handle | [`ResourceCache`] | - |
//! | Compare timestamps | [`FreshnessOracle`] | NotModified when fresh |

pub mod cache;
pub mod conditional;
pub mod freshness;
pub mod locator;
pub mod service;
pub mod store;

pub use cache::{CacheOptions, ResourceCache, ResourceHandle};
pub use freshness::{FreshnessOracle, Watermark};
pub use locator::{is_safe_name, ResourceLocator};
pub use service::{ResourceRequest, ResourceResponse, ResourceService, ServiceOptions};
pub use store::{ContentRef, ContentStore, DirectoryStore, MemoryStore};
