//! Variant resolution.
//!
//! Maps a line item's recorded option selections onto concrete catalog
//! variants. Rules, first match wins:
//!
//! 1. The product has exactly one variant and nothing was selected: that variant.
//! 2. Bundle with nothing selected: the bundle's default component variants.
//! 3. Bundle with selections: each default component with the customer's
//!    overrides applied, looked up in the component product's variants; the
//!    matches of all components are unioned.
//! 4. Anything else with selections: every variant of the product that agrees
//!    with the selection on each dimension the customer chose.
//!
//! No match means the line item is a custom piece and inventory tracking does
//! not apply to it.

use lustre_core::VariantId;

use super::CatalogIndex;
use crate::error::ResolveError;
use crate::models::{LineItem, Product, Variant};

/// Outcome of resolving one line item.
#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    /// One or more variants, every one of which the line item needs a unit of.
    /// Never empty.
    Variants(Vec<&'a Variant>),
    /// Nothing in the catalog matches.
    Custom,
}

impl<'a> Resolution<'a> {
    fn from_matches(matches: Vec<&'a Variant>) -> Self {
        if matches.is_empty() {
            Self::Custom
        } else {
            Self::Variants(matches)
        }
    }

    #[must_use]
    pub fn variants(&self) -> &[&'a Variant] {
        match self {
            Self::Variants(v) => v,
            Self::Custom => &[],
        }
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

/// Resolve a line item against the catalog.
///
/// # Errors
///
/// Returns `ResolveError` when the line item or its bundle points at catalog
/// records that no longer exist.
pub fn resolve<'a>(
    index: &CatalogIndex<'a>,
    line_item: &LineItem,
) -> Result<Resolution<'a>, ResolveError> {
    let Some(product_id) = line_item.product_id else {
        return Ok(Resolution::Custom);
    };
    let product = index
        .product(product_id)
        .ok_or(ResolveError::UnknownProduct {
            line_item: line_item.id,
            product: product_id,
        })?;

    let catalog = index.variants_of(product_id);
    let selection = &line_item.options;

    if catalog.len() == 1 && selection.is_empty() {
        return Ok(Resolution::Variants(catalog.to_vec()));
    }

    if product.is_bundle() {
        let components = bundle_components(index, product)?;
        if selection.is_empty() {
            return Ok(Resolution::from_matches(components));
        }
        return Ok(Resolution::from_matches(resolve_bundle_selection(
            index,
            &components,
            line_item,
        )));
    }

    if selection.is_empty() {
        // Several variants and nothing chosen: no way to tell which one.
        return Ok(Resolution::Custom);
    }

    let matches = catalog
        .iter()
        .copied()
        .filter(|variant| variant.options.satisfies(selection))
        .collect();
    Ok(Resolution::from_matches(matches))
}

fn bundle_components<'a>(
    index: &CatalogIndex<'a>,
    product: &Product,
) -> Result<Vec<&'a Variant>, ResolveError> {
    let ids = product
        .bundle
        .as_ref()
        .map_or(&[][..], |b| b.default_variant_ids.as_slice());

    ids.iter()
        .map(|&id| {
            index
                .variant(id)
                .ok_or(ResolveError::UnknownBundleComponent {
                    product: product.id,
                    variant: id,
                })
        })
        .collect()
}

fn resolve_bundle_selection<'a>(
    index: &CatalogIndex<'a>,
    components: &[&'a Variant],
    line_item: &LineItem,
) -> Vec<&'a Variant> {
    let mut resolved: Vec<&'a Variant> = Vec::new();
    for component in components {
        let wanted = component.options.overridden_by(&line_item.options);
        let matches = index
            .variants_of(component.product_id)
            .iter()
            .copied()
            .filter(|candidate| candidate.options.satisfies(&wanted));

        for candidate in matches {
            if !contains(&resolved, candidate.id) {
                resolved.push(candidate);
            }
        }
    }

    if resolved.len() < components.len() {
        tracing::debug!(
            line_item_id = %line_item.id,
            components = components.len(),
            resolved = resolved.len(),
            "Bundle selection left components unmatched"
        );
    }
    resolved
}

fn contains(variants: &[&Variant], id: VariantId) -> bool {
    variants.iter().any(|v| v.id == id)
}
