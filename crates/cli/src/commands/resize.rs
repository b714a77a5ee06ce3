//! Resize donors for one line item.

use std::path::Path;

use lustre_core::LineItemId;
use lustre_fulfillment::allocation::LineItemState;
use lustre_fulfillment::models::Variant;
use lustre_fulfillment::{SnapshotSource, run_pass};
use serde::Serialize;

use super::print_json;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::snapshot::FileSnapshotSource;

#[derive(Serialize)]
struct Candidates<'a> {
    line_item_id: LineItemId,
    state: LineItemState,
    candidates: Vec<&'a Variant>,
}

/// Print the in-stock variants a line item could be resized from.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the line item is not
/// part of the pass.
pub async fn run(config: &CliConfig, snapshot: &Path, line_item: i32) -> Result<(), CliError> {
    let line_item_id = LineItemId::new(line_item);
    let data = FileSnapshotSource::new(snapshot).load().await?;
    let outcome = run_pass(&data, &config.engine(None));

    let line = outcome
        .line_item(line_item_id)
        .ok_or_else(|| CliError::NotFound(format!("line item {line_item_id} in an open order")))?;

    let candidates = line
        .resize_candidates
        .iter()
        .filter_map(|id| data.variants.iter().find(|v| v.id == *id))
        .collect();

    print_json(&Candidates {
        line_item_id,
        state: line.state,
        candidates,
    })
}
