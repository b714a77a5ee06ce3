//! On-hand inventory level for a resolved line item.
//!
//! A line item needs one unit of every resolved variant at once, so the level
//! is the scarcest variant's on-hand count. Negative counts read as zero.

use crate::models::Variant;

/// Sellable on-hand quantity for a set of resolved variants.
///
/// Returns 0 for an empty set.
#[must_use]
pub fn inventory_level(variants: &[&Variant]) -> i32 {
    variants.iter().map(|v| v.on_hand()).min().unwrap_or(0)
}
