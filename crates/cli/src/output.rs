//! File-backed sinks.
//!
//! One JSON object per line for line items, orders and shipment plans, and a
//! single JSON document for the tab counts:
//!
//! ```text
//! <dir>/line_items.jsonl
//! <dir>/orders.jsonl
//! <dir>/shipments.jsonl
//! <dir>/tab_counts.json
//! ```

use std::path::{Path, PathBuf};

use lustre_fulfillment::shipment::ShipmentPlan;
use lustre_fulfillment::{
    LineItemUpdate, MetricsSink, OrderUpdate, PersistenceSink, ShipmentSink, SinkError, TabCounts,
};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

const LINE_ITEMS_FILE: &str = "line_items.jsonl";
const ORDERS_FILE: &str = "orders.jsonl";
const SHIPMENTS_FILE: &str = "shipments.jsonl";
const TAB_COUNTS_FILE: &str = "tab_counts.json";

/// Writes pass results into a directory.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    dir: PathBuf,
}

impl JsonlSink {
    /// Prepare `dir` for a fresh run, truncating output from earlier runs.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Io` if the directory or files cannot be created.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        for name in [LINE_ITEMS_FILE, ORDERS_FILE, SHIPMENTS_FILE] {
            tokio::fs::write(dir.join(name), b"").await?;
        }
        tracing::debug!(dir = %dir.display(), "Output directory ready");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn append<T: Serialize + Sync>(&self, name: &str, record: &T) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.dir.join(name))
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

impl PersistenceSink for JsonlSink {
    async fn save_line_item(&self, update: &LineItemUpdate) -> Result<(), SinkError> {
        self.append(LINE_ITEMS_FILE, update).await
    }

    async fn save_order(&self, update: &OrderUpdate) -> Result<(), SinkError> {
        self.append(ORDERS_FILE, update).await
    }
}

impl ShipmentSink for JsonlSink {
    async fn save_plan(&self, plan: &ShipmentPlan) -> Result<(), SinkError> {
        self.append(SHIPMENTS_FILE, plan).await
    }
}

impl MetricsSink for JsonlSink {
    async fn save_tab_counts(&self, counts: &TabCounts) -> Result<(), SinkError> {
        let json = serde_json::to_vec_pretty(counts)?;
        tokio::fs::write(self.dir.join(TAB_COUNTS_FILE), json).await?;
        Ok(())
    }
}
