//! Errors surfaced by CLI commands.

use lustre_fulfillment::{FeedError, SinkError};
use thiserror::Error;

use crate::config::ConfigError;

/// A command failed.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot could not be loaded.
    #[error("Snapshot error: {0}")]
    Feed(#[from] FeedError),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writeback finished with failed records.
    #[error("{0} records failed to write")]
    PartialWrite(usize),

    /// Requested record is not in the snapshot.
    #[error("Not found: {0}")]
    NotFound(String),
}
