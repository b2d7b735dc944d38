//! QKART Core - Shared types library.
//!
//! This crate provides the types used across all QKART components:
//! - `storefront` - Catalog view controller, API client and terminal storefront
//! - `cli` - Command-line tools for managing the persisted session
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no timers. Everything here can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Products, cart entries, reconciled cart items and notifications
//! - [`layout`] - Session-aware grid layout of the catalog page
//! - [`nav`] - Top-level pages and the header's navigation state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod layout;
pub mod nav;
pub mod types;

pub use types::*;
