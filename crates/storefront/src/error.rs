//! Unified error handling with Sentry integration.
//!
//! The catalog controller handles its own failures by notifying the user.
//! `AppError` covers what is left: startup and front-end failures that end a
//! command or the whole process.

use thiserror::Error;

use crate::config::ConfigError;
use crate::session::SessionError;

/// Application-level error type for the storefront binaries.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persisted session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// A page failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The user typed something that is not a command.
    #[error("Bad command: {0}")]
    BadCommand(String),
}

impl AppError {
    /// Whether the error should end the interactive session.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Io(_))
    }

    /// Log the error, capturing unexpected failures to Sentry.
    pub fn report(&self) {
        if matches!(self, Self::BadCommand(_)) {
            tracing::debug!(error = %self, "Rejected command");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront error"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadCommand("frobnicate".to_string());
        assert_eq!(err.to_string(), "Bad command: frobnicate");

        let err = AppError::Config(ConfigError::NoDataDir);
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(AppError::Config(ConfigError::NoDataDir).is_fatal());
        assert!(AppError::Io(std::io::Error::other("closed")).is_fatal());
        assert!(!AppError::BadCommand("x".to_string()).is_fatal());
    }
}
