//! Cart entries and their reconciliation against the product catalog.
//!
//! The backend's cart (`GET /cart`, `POST /cart`) only carries product
//! references and quantities. Display fields come from joining each entry
//! with the catalog:
//!
//! ```text
//! cart entries  ──┐
//!                 ├── generate_cart_items() ──> [CartItem]   (inner join)
//! catalog       ──┘
//! ```
//!
//! Entries whose product is not in the catalog are dropped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Cost, Product, ProductId};

/// A cart line as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product_id: ProductId,
    pub qty: u32,
}

impl CartEntry {
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, qty: u32) -> Self {
        Self {
            product_id: product_id.into(),
            qty,
        }
    }
}

/// A cart entry joined with its catalog product, ready for rendering.
///
/// Derived data: recomputed whenever the cart or the catalog changes and
/// never sent back to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub qty: u32,
    pub name: String,
    pub category: String,
    pub cost: Cost,
    pub rating: f64,
    pub image: String,
}

impl CartItem {
    fn join(entry: &CartEntry, product: &Product) -> Self {
        Self {
            product_id: entry.product_id.clone(),
            qty: entry.qty,
            name: product.name.clone(),
            category: product.category.clone(),
            cost: product.cost,
            rating: product.rating,
            image: product.image.clone(),
        }
    }

    /// Cost of this line (unit cost times quantity).
    #[must_use]
    pub fn line_cost(&self) -> Cost {
        self.cost * self.qty
    }
}

/// Join cart entries against the catalog.
///
/// Output order follows `entries`. Entries referencing products missing from
/// `catalog` are dropped.
#[must_use]
pub fn generate_cart_items(entries: &[CartEntry], catalog: &[Product]) -> Vec<CartItem> {
    let by_id: HashMap<&ProductId, &Product> = catalog.iter().map(|p| (&p.id, p)).collect();

    entries
        .iter()
        .filter_map(|entry| {
            by_id
                .get(&entry.product_id)
                .map(|product| CartItem::join(entry, product))
        })
        .collect()
}

/// Whether `product_id` already has a line in `items`.
#[must_use]
pub fn is_item_in_cart(items: &[CartItem], product_id: &ProductId) -> bool {
    items.iter().any(|item| &item.product_id == product_id)
}

/// Totals shown at the bottom of the cart panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Sum of `cost * qty` over all items.
    pub total_cost: Cost,
    /// Sum of quantities over all items.
    pub total_quantity: u32,
}

impl CartSummary {
    #[must_use]
    pub fn of(items: &[CartItem]) -> Self {
        Self {
            total_cost: items.iter().map(CartItem::line_cost).sum(),
            total_quantity: items.iter().map(|item| item.qty).sum(),
        }
    }
}
