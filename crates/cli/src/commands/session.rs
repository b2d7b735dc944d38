//! Persisted session management.

use std::io::Write;

use qkart_storefront::config::StorefrontConfig;
use qkart_storefront::session::{Session, SessionStore};
use tracing::info;

use super::CommandError;

/// Store a session as the login page would after a successful login.
///
/// # Errors
///
/// Returns an error if the session file cannot be written.
pub async fn set(
    config: &StorefrontConfig,
    token: String,
    username: String,
) -> Result<(), CommandError> {
    let store = SessionStore::open(&config.session_file).await?;
    store.sign_in(Session::signed_in(token, username)).await?;

    info!(path = %store.path().display(), "Session stored");
    Ok(())
}

/// Remove the stored session.
///
/// # Errors
///
/// Returns an error if the session file exists but cannot be removed.
pub async fn clear(config: &StorefrontConfig) -> Result<(), CommandError> {
    let store = SessionStore::open(&config.session_file).await?;
    store.logout().await?;

    info!(path = %store.path().display(), "Session cleared");
    Ok(())
}

/// Print who is signed in. The token itself is never printed.
///
/// # Errors
///
/// Returns an error if the session file cannot be read.
pub async fn show(config: &StorefrontConfig, out: &mut impl Write) -> Result<(), CommandError> {
    let store = SessionStore::open(&config.session_file).await?;
    let session = store.current();

    match session.username() {
        Some(username) if session.is_authenticated() => {
            writeln!(out, "Signed in as {username}")?;
        }
        _ => writeln!(out, "Not signed in")?,
    }
    writeln!(out, "Session file: {}", store.path().display())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> StorefrontConfig {
        let path = dir.path().join("session.json");
        StorefrontConfig::from_lookup(|key| {
            (key == "QKART_SESSION_FILE").then(|| path.to_string_lossy().into_owned())
        })
        .unwrap()
    }

    async fn shown(config: &StorefrontConfig) -> String {
        let mut out = Vec::new();
        show(config, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_set_show_clear() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        assert!(shown(&config).await.starts_with("Not signed in"));

        set(&config, "secret-token".to_string(), "crio".to_string())
            .await
            .unwrap();
        let text = shown(&config).await;
        assert!(text.starts_with("Signed in as crio"));
        assert!(!text.contains("secret-token"));

        clear(&config).await.unwrap();
        assert!(shown(&config).await.starts_with("Not signed in"));
    }

    #[tokio::test]
    async fn test_clear_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        clear(&config).await.unwrap();
        assert!(!config.session_file.exists());
    }
}
