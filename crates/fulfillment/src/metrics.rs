//! Dashboard tab counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::OrderClassification;

/// Tabs of the order dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTab {
    FullyShippable,
    PartiallyShippable,
    NeedsAction,
    AwaitingInventory,
    Resizable,
    Custom,
}

impl OrderTab {
    pub const ALL: [Self; 6] = [
        Self::FullyShippable,
        Self::PartiallyShippable,
        Self::NeedsAction,
        Self::AwaitingInventory,
        Self::Resizable,
        Self::Custom,
    ];

    /// Whether an order is listed under this tab. Tabs overlap.
    #[must_use]
    pub const fn contains(self, order: &OrderClassification) -> bool {
        match self {
            Self::FullyShippable => order.fully_shippable,
            Self::PartiallyShippable => order.partially_shippable,
            Self::NeedsAction => order.needs_action,
            Self::AwaitingInventory => order.awaiting_inventory,
            Self::Resizable => order.resizable,
            Self::Custom => order.has_custom,
        }
    }
}

impl std::str::FromStr for OrderTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fully_shippable" | "shippable" => Ok(Self::FullyShippable),
            "partially_shippable" | "partial" => Ok(Self::PartiallyShippable),
            "needs_action" => Ok(Self::NeedsAction),
            "awaiting_inventory" | "awaiting" => Ok(Self::AwaitingInventory),
            "resizable" => Ok(Self::Resizable),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("invalid order tab: {s}")),
        }
    }
}

/// Snapshot of per-tab order counts written after every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabCounts {
    pub run_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub total: usize,
    pub fully_shippable: usize,
    pub partially_shippable: usize,
    pub needs_action: usize,
    pub awaiting_inventory: usize,
    pub resizable: usize,
    pub has_custom: usize,
}

impl TabCounts {
    #[must_use]
    pub fn tally(run_id: Uuid, computed_at: DateTime<Utc>, orders: &[OrderClassification]) -> Self {
        let count = |tab: OrderTab| orders.iter().filter(|o| tab.contains(o)).count();
        Self {
            run_id,
            computed_at,
            total: orders.len(),
            fully_shippable: count(OrderTab::FullyShippable),
            partially_shippable: count(OrderTab::PartiallyShippable),
            needs_action: count(OrderTab::NeedsAction),
            awaiting_inventory: count(OrderTab::AwaitingInventory),
            resizable: count(OrderTab::Resizable),
            has_custom: count(OrderTab::Custom),
        }
    }

    #[must_use]
    pub const fn count(&self, tab: OrderTab) -> usize {
        match tab {
            OrderTab::FullyShippable => self.fully_shippable,
            OrderTab::PartiallyShippable => self.partially_shippable,
            OrderTab::NeedsAction => self.needs_action,
            OrderTab::AwaitingInventory => self.awaiting_inventory,
            OrderTab::Resizable => self.resizable,
            OrderTab::Custom => self.has_custom,
        }
    }
}
