// Cart domain types
//
// One cart per user. The total is always derived from the line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A priced line item. Shared by carts and orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LineItem {
    /// Unique identifier for the line item.
    pub id: Uuid,
    /// Product this line refers to.
    pub product_id: Uuid,
    /// Product name at the time the line was priced.
    pub name: String,
    /// Unit price at the time the line was priced.
    pub price: f64,
    /// Number of units, at least 1.
    pub quantity: u32,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Sum of price × quantity over all lines.
pub fn total_amount(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::subtotal).sum()
}

/// Shopping cart owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Cart {
    /// Unique identifier for the cart.
    pub id: Uuid,
    /// Owner of the cart.
    pub user_id: Uuid,
    pub items: Vec<LineItem>,
    /// Always equal to the sum of the line subtotals.
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            items: Vec::new(),
            total_amount: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn item(&self, item_id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Units the line for `product_id` would hold after adding `extra` more.
    /// `None` if the sum overflows.
    pub fn quantity_after_add(&self, product_id: Uuid, extra: u32) -> Option<u32> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map_or(0, |i| i.quantity)
            .checked_add(extra)
    }

    /// Add units of a product, merging with an existing line for the same product.
    /// Callers bound the merged quantity with [`Cart::quantity_after_add`] first.
    pub fn add_item(&mut self, item: LineItem) -> &LineItem {
        let idx = match self.items.iter().position(|i| i.product_id == item.product_id) {
            Some(idx) => {
                let existing = &mut self.items[idx];
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                existing.price = item.price;
                existing.name = item.name;
                idx
            }
            None => {
                self.items.push(item);
                self.items.len() - 1
            }
        };
        self.recompute_total();
        &self.items[idx]
    }

    /// Set the quantity of a line. Returns false if the line does not exist.
    pub fn set_quantity(&mut self, item_id: Uuid, quantity: u32) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return false;
        };
        item.quantity = quantity;
        self.recompute_total();
        true
    }

    /// Remove a line. Returns false if the line does not exist.
    pub fn remove_item(&mut self, item_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        self.recompute_total();
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total_amount = total_amount(&self.items);
    }
}
