//! Configuration schema for n9res
//!
//! Configuration is stored at `~/.config/n9res/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Bundle location and metadata
    pub bundle: BundleConfig,

    /// Resource namespace and layout
    pub resources: ResourcesConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Bundle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Bundle root directory
    pub root: PathBuf,

    /// Symbolic name of the bundle
    pub symbolic_name: String,

    /// Fixed last-modified watermark in epoch millis (overrides the bundle's own)
    pub last_modified: Option<i64>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            symbolic_name: "com.notesin9.base".to_string(),
            last_modified: None,
        }
    }
}

/// Resource serving settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Namespace; requests are routed under `.<namespace>/`
    pub namespace: String,

    /// Directory inside the bundle holding web resources
    pub base_dir: String,

    /// URL root the host mounts resource namespaces under
    pub url_root: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            namespace: "notesin9".to_string(),
            base_dir: "resources/web".to_string(),
            url_root: "/.ibmxspres/".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoize resource handles for the process lifetime (default: true)
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
