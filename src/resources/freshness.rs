//! Bundle-wide last-modified watermark and staleness checks
//!
//! The bundle is deployed as one unit, so a single timestamp versions every
//! resource in it. Per-file modification times are not tracked.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::{debug, warn};

/// Manifest whose modification time marks a bundle update
pub const BUNDLE_MANIFEST: &str = "META-INF/MANIFEST.MF";

/// Last-modified time of the whole resource set, in epoch millis
///
/// Negative values mean the time is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Watermark(i64);

impl Watermark {
    /// Sentinel for an unavailable timestamp
    pub const UNKNOWN: Watermark = Watermark(-1);

    /// Wrap a raw epoch-millis value
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Convert a system time, truncated to whole seconds
    ///
    /// HTTP dates carry second precision, so a sub-second watermark would
    /// never compare equal to the `If-Modified-Since` a client echoes back.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs())
                .ok()
                .and_then(|secs| secs.checked_mul(1000))
                .map(Self)
                .unwrap_or(Self::UNKNOWN),
            Err(_) => Self::UNKNOWN,
        }
    }

    /// Derive the watermark from a bundle root
    ///
    /// Uses the manifest's modification time when present, otherwise the
    /// root directory's. Falls back to [`Watermark::UNKNOWN`].
    pub async fn of_bundle(root: &Path) -> Self {
        let manifest = root.join(BUNDLE_MANIFEST);
        let has_manifest = fs::metadata(&manifest)
            .await
            .is_ok_and(|meta| meta.is_file());
        let source = if has_manifest {
            manifest
        } else {
            root.to_path_buf()
        };

        match fs::metadata(&source).await.and_then(|m| m.modified()) {
            Ok(modified) => {
                let watermark = Self::from_system_time(modified);
                debug!("Bundle watermark {} from {}", watermark.0, source.display());
                watermark
            }
            Err(e) => {
                warn!("Bundle last-modified unavailable ({}): {}", source.display(), e);
                Self::UNKNOWN
            }
        }
    }

    /// Raw epoch-millis value
    pub fn millis(self) -> i64 {
        self.0
    }

    /// Whether the timestamp is known
    pub fn is_known(self) -> bool {
        self.0 >= 0
    }

    /// As a UTC datetime, if known
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.is_known() {
            return None;
        }
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }
}

/// Decides whether a client's cached copy is out of date
#[derive(Debug, Clone, Copy)]
pub struct FreshnessOracle {
    watermark: Watermark,
}

impl FreshnessOracle {
    /// Create an oracle around a fixed watermark
    pub fn new(watermark: Watermark) -> Self {
        Self { watermark }
    }

    /// The watermark in use
    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    /// Check whether a copy cached at `client_timestamp` is stale
    ///
    /// An unknown watermark makes everything stale.
    pub fn is_stale(&self, client_timestamp: i64) -> bool {
        if !self.watermark.is_known() {
            return true;
        }
        client_timestamp < self.watermark.0
    }
}
