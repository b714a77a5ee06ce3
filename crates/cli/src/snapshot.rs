//! Snapshot files on disk.

use std::path::{Path, PathBuf};

use lustre_fulfillment::{FeedError, Snapshot, SnapshotSource};

/// Snapshot file format, picked from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Detect the format of a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::UnsupportedFormat` for anything but `.json`, `.yaml` or `.yml`.
    pub fn detect(path: &Path) -> Result<Self, FeedError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(FeedError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse snapshot contents in this format.
    ///
    /// # Errors
    ///
    /// Returns `FeedError` if the contents are not a valid snapshot.
    pub fn parse(self, content: &str) -> Result<Snapshot, FeedError> {
        match self {
            Self::Json => Snapshot::from_json_str(content),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| FeedError::Parse(e.to_string())),
        }
    }
}

/// A snapshot stored in a JSON or YAML file.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSnapshotSource {
    async fn load(&self) -> Result<Snapshot, FeedError> {
        let format = SnapshotFormat::detect(&self.path)?;
        tracing::info!(path = %self.path.display(), ?format, "Loading snapshot");

        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = format.parse(&content)?;

        tracing::info!(
            orders = snapshot.orders.len(),
            variants = snapshot.variants.len(),
            vendor_orders = snapshot.vendor_orders.len(),
            resizes = snapshot.resizes.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }
}
