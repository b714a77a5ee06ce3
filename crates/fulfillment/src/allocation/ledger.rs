//! Running claims against on-hand stock.

use std::collections::HashMap;

use lustre_core::VariantId;

use crate::inventory::inventory_level;
use crate::models::Variant;

/// Result of trying to claim on-hand stock for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The full quantity was claimed.
    Claimed,
    /// Not enough stock left. `unclaimed` is what earlier claims left over.
    Short { unclaimed: i32 },
}

/// Units claimed per variant so far in this pass.
///
/// Claims are checked against the line item's inventory level (the minimum
/// across its variants), and a line item claims its full ordered quantity on
/// every one of its variants or nothing at all.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    claimed: HashMap<VariantId, i32>,
}

impl ClaimLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units already claimed against a variant.
    #[must_use]
    pub fn claimed(&self, variant: VariantId) -> i32 {
        self.claimed.get(&variant).copied().unwrap_or(0)
    }

    /// Claim `quantity` units of every variant if they all still fit.
    pub fn try_claim(&mut self, variants: &[&Variant], quantity: i32) -> ClaimOutcome {
        let level = inventory_level(variants);
        if variants.is_empty() {
            return ClaimOutcome::Short { unclaimed: 0 };
        }

        let fits = variants.iter().all(|v| match self.claimed.get(&v.id) {
            None => quantity <= level,
            Some(&already) => already.checked_add(quantity).is_some_and(|total| total <= level),
        });

        if fits {
            for v in variants {
                let claimed = self.claimed.entry(v.id).or_insert(0);
                *claimed = claimed.saturating_add(quantity);
            }
            return ClaimOutcome::Claimed;
        }

        let most_claimed = variants
            .iter()
            .map(|v| self.claimed(v.id))
            .max()
            .unwrap_or(0);
        ClaimOutcome::Short {
            unclaimed: (level - most_claimed).max(0),
        }
    }
}
