//! Wire payloads that only exist at the HTTP boundary.
//!
//! Domain types (`Product`, `CartEntry`) live in `qkart-core`.

use qkart_core::ProductId;
use serde::{Deserialize, Serialize};

/// Body of a failed request: `{ "success": false, "message": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub success: bool,
    pub message: String,
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdateRequest<'a> {
    pub product_id: &'a ProductId,
    pub qty: u32,
}
