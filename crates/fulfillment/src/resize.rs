//! Resize donor search.
//!
//! A ring ordered in a size that is out of stock can often be made from the
//! same ring in a neighbouring size. This module finds those donors. It only
//! applies to line items resolved to exactly one sized variant with nothing on
//! hand; callers are expected to have ruled out incoming reservations first.

use crate::catalog::CatalogIndex;
use crate::models::Variant;

/// In-stock siblings of the ordered variant that differ only in size.
///
/// Returns an empty list when the line item is not a resize case: more than
/// one resolved variant, no size dimension, or stock on hand.
#[must_use]
pub fn resize_candidates<'a>(
    index: &CatalogIndex<'a>,
    resolved: &[&Variant],
    inventory_level: i32,
) -> Vec<&'a Variant> {
    let [ordered] = resolved else {
        return Vec::new();
    };
    if !ordered.options.has_size() || inventory_level > 0 {
        return Vec::new();
    }

    index
        .variants_of(ordered.product_id)
        .iter()
        .copied()
        .filter(|sibling| is_donor(ordered, sibling))
        .collect()
}

fn is_donor(ordered: &Variant, sibling: &Variant) -> bool {
    sibling.id != ordered.id
        && sibling.inventory > 0
        && sibling.options.has_size()
        && sibling.options.matches_except_size(&ordered.options)
}
