//! Catalog products as returned by `GET /products`.

use serde::{Deserialize, Serialize};

use super::{Cost, ProductId};

/// A product in the QKART catalog.
///
/// Immutable from the client's perspective; sourced entirely from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier (`_id` on the wire).
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Unit cost.
    pub cost: Cost,
    /// Average rating, typically on a 0-5 scale.
    pub rating: f64,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}
