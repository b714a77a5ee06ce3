//! Run an allocation pass and write its results.
//!
//! # Usage
//!
//! ```bash
//! # Write results to ./out (or LUSTRE_OUTPUT_DIR)
//! lustre allocate --snapshot snapshot.json
//!
//! # List orders by date needed and write elsewhere
//! lustre allocate --snapshot snapshot.yaml --sort date_needed_asc --out results/
//!
//! # Print the pass summary without writing anything
//! lustre allocate --snapshot snapshot.json --dry-run
//! ```

use std::path::{Path, PathBuf};

use lustre_fulfillment::{OrderSort, SnapshotSource, persist, run_pass};

use super::print_json;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::JsonlSink;
use crate::snapshot::FileSnapshotSource;

/// Run a pass over a snapshot file.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the output directory
/// cannot be prepared, or any record failed to write.
pub async fn run(
    config: &CliConfig,
    snapshot: &Path,
    sort: Option<OrderSort>,
    out: Option<PathBuf>,
    dry_run: bool,
) -> Result<(), CliError> {
    let engine = config.engine(sort);
    let data = FileSnapshotSource::new(snapshot).load().await?;
    let outcome = run_pass(&data, &engine);

    if dry_run {
        tracing::info!("Dry run, nothing written");
        print_json(&outcome.summary)?;
        return Ok(());
    }

    let dir = out.unwrap_or_else(|| config.output_dir.clone());
    let sink = JsonlSink::create(&dir).await?;
    let report = persist(&outcome, &sink).await;

    tracing::info!(
        dir = %sink.dir().display(),
        line_items = report.line_items_written,
        orders = report.orders_written,
        shipment_plans = report.shipment_plans_written,
        "Results written"
    );

    match report.failures() {
        0 => Ok(()),
        failed => Err(CliError::PartialWrite(failed)),
    }
}
