//! Dashboard tab counts.

use std::path::Path;

use lustre_fulfillment::{OrderSort, OrderTab, SnapshotSource, run_pass};
use serde::Serialize;

use super::print_json;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::snapshot::FileSnapshotSource;

#[derive(Serialize)]
struct TabListing<'a> {
    tab: OrderTab,
    orders: Vec<&'a str>,
}

/// Print tab counts, or the orders in one tab when `list` is given.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded.
pub async fn run(
    config: &CliConfig,
    snapshot: &Path,
    sort: Option<OrderSort>,
    list: Option<OrderTab>,
) -> Result<(), CliError> {
    let data = FileSnapshotSource::new(snapshot).load().await?;
    let outcome = run_pass(&data, &config.engine(sort));

    match list {
        Some(tab) => print_json(&TabListing {
            tab,
            orders: outcome
                .orders_in_tab(tab)
                .into_iter()
                .map(|o| o.order_name.as_str())
                .collect(),
        }),
        None => print_json(&outcome.tab_counts),
    }
}
