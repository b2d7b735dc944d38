//! QKART storefront client library.
//!
//! The catalog controller, the QKART API client and the terminal front end,
//! exposed as a library so the binaries and integration tests share them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod notify;
pub mod qkart;
pub mod session;
pub mod shell;
pub mod view;
