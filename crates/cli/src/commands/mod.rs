//! Subcommand implementations.
//!
//! Commands write their human-readable output to the writer they are given
//! and log progress through `tracing`.

use qkart_storefront::config::ConfigError;
use qkart_storefront::qkart::ApiError;
use qkart_storefront::session::SessionError;
use thiserror::Error;

pub mod session;
pub mod shop;

/// Errors a CLI command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("QKART backend request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Could not write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not signed in; run `qkart session set` first")]
    NotSignedIn,
}
