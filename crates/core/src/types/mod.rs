//! Core types for QKART.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod notification;
pub mod price;
pub mod product;

pub use cart::{CartEntry, CartItem, CartSummary, generate_cart_items, is_item_in_cart};
pub use id::ProductId;
pub use notification::{Notification, Severity};
pub use price::Cost;
pub use product::Product;
