//! Bundle descriptor, lifecycle messages and resource inventory

use crate::config::Config;
use crate::error::{ResourceError, ResourceResult};
use crate::resources::is_safe_name;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Component libraries the bundle's library builds on
pub const LIBRARY_DEPENDENCIES: [&str; 2] = ["com.ibm.xsp.core.library", "com.ibm.xsp.extsn.library"];

/// Static description of the bundle and its resource namespace
#[derive(Debug, Clone, Serialize)]
pub struct BundleInfo {
    pub symbolic_name: String,
    pub library_id: String,
    pub dependencies: Vec<String>,
    pub global_scope: bool,
    pub namespace: String,
    /// Resource directory inside the bundle, e.g. `/resources/web/`
    pub resource_path: String,
    /// Public URL root, e.g. `/.ibmxspres/.notesin9/`
    pub url_path: String,
}

impl BundleInfo {
    /// Build the descriptor from configuration
    pub fn from_config(config: &Config) -> Self {
        let symbolic_name = config.bundle.symbolic_name.clone();
        let namespace = config.resources.namespace.clone();
        let url_root = config.resources.url_root.trim_end_matches('/');

        Self {
            library_id: format!("{}.library", symbolic_name),
            symbolic_name,
            dependencies: LIBRARY_DEPENDENCIES.iter().map(|d| d.to_string()).collect(),
            global_scope: false,
            resource_path: format!("/{}/", config.resources.base_dir.trim_matches('/')),
            url_path: format!("{}/.{}/", url_root, namespace),
            namespace,
        }
    }

    /// Public URL for a resource name
    pub fn resource_url(&self, name: &str) -> String {
        format!("{}{}", self.url_path, name)
    }
}

/// Start/stop messages around the bundle's active lifetime
///
/// The stop message is logged when the guard is dropped, including on
/// early error returns.
pub struct BundleLifecycle {
    info: BundleInfo,
}

impl BundleLifecycle {
    /// Mark the bundle started
    pub fn start(info: BundleInfo) -> Self {
        info!("{} started", info.symbolic_name);
        Self { info }
    }

    /// Descriptor of the running bundle
    pub fn info(&self) -> &BundleInfo {
        &self.info
    }

    /// Mark the bundle stopped
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for BundleLifecycle {
    fn drop(&mut self) {
        info!("{} stopped", self.info.symbolic_name);
    }
}

/// A servable file found in the bundle
#[derive(Debug, Clone, Serialize)]
pub struct BundleResource {
    /// Name relative to the resource directory, `/`-separated
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Walk the resource directory and list every servable file, sorted by name
///
/// Files whose relative name would be rejected by the locator are skipped.
pub fn scan_resources(root: &Path, base_dir: &str) -> ResourceResult<Vec<BundleResource>> {
    let dir = root.join(base_dir.trim_matches('/'));
    if !dir.is_dir() {
        return Err(ResourceError::ResourceDirNotFound(dir));
    }

    let mut resources = Vec::new();
    for entry in WalkDir::new(&dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let context = format!("walking {}", dir.display());
            match e.into_io_error() {
                Some(source) => ResourceError::io(context, source),
                None => ResourceError::Internal(context),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !is_safe_name(&name) {
            continue;
        }

        let metadata = entry
            .metadata()
            .map_err(|e| ResourceError::Internal(format!("reading metadata of {}: {}", name, e)))?;

        resources.push(BundleResource {
            content_type: mime_guess::from_path(&name)
                .first_or_octet_stream()
                .to_string(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            name,
        });
    }

    resources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn descriptor_defaults() {
        let info = BundleInfo::from_config(&Config::default());
        assert_eq!(info.symbolic_name, "com.notesin9.base");
        assert_eq!(info.library_id, "com.notesin9.base.library");
        assert_eq!(
            info.dependencies,
            vec!["com.ibm.xsp.core.library", "com.ibm.xsp.extsn.library"]
        );
        assert!(!info.global_scope);
        assert_eq!(info.resource_path, "/resources/web/");
        assert_eq!(info.url_path, "/.ibmxspres/.notesin9/");
        assert_eq!(info.resource_url("app.css"), "/.ibmxspres/.notesin9/app.css");
    }

    #[test]
    fn lifecycle_roundtrip() {
        let lifecycle = BundleLifecycle::start(BundleInfo::from_config(&Config::default()));
        assert_eq!(lifecycle.info().namespace, "notesin9");
        lifecycle.stop();
    }

    #[test]
    fn scan_lists_nested_files() {
        let temp = TempDir::new().unwrap();
        let web = temp.path().join("resources/web");
        std::fs::create_dir_all(web.join("img")).unwrap();
        std::fs::write(web.join("app.css"), "body{}").unwrap();
        std::fs::write(web.join("img/logo.png"), [0u8; 4]).unwrap();

        let resources = scan_resources(temp.path(), "resources/web").unwrap();
        let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["app.css", "img/logo.png"]);
        assert_eq!(resources[0].content_type, "text/css");
        assert_eq!(resources[0].size, 6);
        assert_eq!(resources[1].content_type, "image/png");
    }

    #[test]
    fn scan_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = scan_resources(temp.path(), "resources/web").unwrap_err();
        assert!(matches!(err, ResourceError::ResourceDirNotFound(_)));
    }
}
