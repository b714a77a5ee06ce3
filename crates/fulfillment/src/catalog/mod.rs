//! Catalog lookups.
//!
//! [`CatalogIndex`] borrows the snapshot's products and variants and keeps
//! index maps for the lookups the resolver and the resize matcher need.
//! Variants of a product are kept in catalog order.

pub mod resolver;

use std::collections::HashMap;

use lustre_core::{ProductId, VariantId};

use crate::models::{Product, Variant};

pub use resolver::{Resolution, resolve};

/// Read-only index over the variant catalog.
#[derive(Debug, Default)]
pub struct CatalogIndex<'a> {
    products: HashMap<ProductId, &'a Product>,
    variants: HashMap<VariantId, &'a Variant>,
    by_product: HashMap<ProductId, Vec<&'a Variant>>,
}

impl<'a> CatalogIndex<'a> {
    /// Build the index. Later duplicates of an ID replace earlier ones.
    #[must_use]
    pub fn build(products: &'a [Product], variants: &'a [Variant]) -> Self {
        let products = products.iter().map(|p| (p.id, p)).collect();

        let mut by_id = HashMap::with_capacity(variants.len());
        let mut by_product: HashMap<ProductId, Vec<&'a Variant>> = HashMap::new();
        for variant in variants {
            if by_id.insert(variant.id, variant).is_some() {
                tracing::warn!(variant_id = %variant.id, "Duplicate variant in catalog feed");
            }
            by_product.entry(variant.product_id).or_default().push(variant);
        }

        Self {
            products,
            variants: by_id,
            by_product,
        }
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&'a Product> {
        self.products.get(&id).copied()
    }

    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&'a Variant> {
        self.variants.get(&id).copied()
    }

    /// Variants of a product in catalog order.
    #[must_use]
    pub fn variants_of(&self, product: ProductId) -> &[&'a Variant] {
        self.by_product.get(&product).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use lustre_core::OptionSignature;

    use super::*;

    fn variant(id: i32, product: i32) -> Variant {
        Variant {
            id: VariantId::new(id),
            product_id: ProductId::new(product),
            options: OptionSignature::default(),
            inventory: 0,
            sku: None,
        }
    }

    #[test]
    fn test_variants_of_keeps_catalog_order() {
        let products = vec![Product {
            id: ProductId::new(1),
            title: "Band".to_string(),
            bundle: None,
        }];
        let variants = vec![variant(3, 1), variant(1, 1), variant(2, 2)];
        let index = CatalogIndex::build(&products, &variants);

        let ids: Vec<_> = index
            .variants_of(ProductId::new(1))
            .iter()
            .map(|v| v.id.as_i32())
            .collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(index.variants_of(ProductId::new(9)).is_empty());
        assert!(index.product(ProductId::new(1)).is_some());
        assert!(index.product(ProductId::new(2)).is_none());
        assert_eq!(index.variant(VariantId::new(2)).map(|v| v.product_id), Some(ProductId::new(2)));
    }
}
