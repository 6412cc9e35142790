//! Error types for n9res
//!
//! All modules use `ResourceResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for n9res operations
pub type ResourceResult<T> = Result<T, ResourceError>;

/// All errors that can occur in n9res
#[derive(Error, Debug)]
pub enum ResourceError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid resource namespace '{namespace}': {reason}")]
    NamespaceInvalid { namespace: String, reason: String },

    // Bundle errors
    #[error("Bundle root not found: {0}")]
    BundleNotFound(PathBuf),

    #[error("Resource directory not found in bundle: {0}")]
    ResourceDirNotFound(PathBuf),

    // Resource errors
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Failed to retrieve resource {path}: {source}")]
    Retrieval {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl ResourceError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a retrieval error for a store path
    pub fn retrieval(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Retrieval {
            path: path.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::BundleNotFound(_) => Some("Pass --bundle <DIR> or run: n9res config set bundle.root <DIR>"),
            Self::ResourceDirNotFound(_) => {
                Some("Check resources.base_dir, resources are served from <bundle>/resources/web by default")
            }
            Self::NamespaceInvalid { .. } => Some("Run: n9res config set resources.namespace notesin9"),
            Self::ResourceNotFound(_) => Some("Run: n9res list"),
            _ => None,
        }
    }
}
