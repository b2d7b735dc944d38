//! Persisted session (token + display username) and its change feed.
//!
//! The session is set by the external login flow, read by every
//! cart-affecting operation, and cleared wholesale on logout. It is stored
//! as a small JSON file:
//!
//! ```json
//! { "token": "eyJhbGciOi...", "username": "crio.do" }
//! ```
//!
//! [`SessionStore`] owns the file and publishes every change on a
//! `tokio::sync::watch` channel. Consumers hold a [`SessionWatch`] and never
//! write to the session themselves.

use std::io;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;

#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600;

/// Errors reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Session file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Authentication state of the current user.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    username: Option<String>,
}

impl Session {
    /// A signed-in session.
    #[must_use]
    pub fn signed_in(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            username: Some(username.into()),
        }
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Display name stored alongside the token.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .finish()
    }
}

/// On-disk form of [`Session`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            // An empty token is treated as signed out
            token: stored
                .token
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            username: stored.username,
        }
    }
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.as_ref().map(|t| t.expose_secret().to_string()),
            username: session.username.clone(),
        }
    }
}

/// Read-only view of the current session that is notified on change.
pub type SessionWatch = watch::Receiver<Session>;

/// Owner of the persisted session.
pub struct SessionStore {
    path: PathBuf,
    tx: watch::Sender<Session>,
}

impl SessionStore {
    /// Open the store at `path`, loading any existing session.
    ///
    /// A missing file means signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let session = read_session(&path).await?;
        tracing::debug!(path = %path.display(), authenticated = session.is_authenticated(), "Session loaded");

        let (tx, _rx) = watch::channel(session);
        Ok(Self { path, tx })
    }

    /// A store that is never persisted (tests, ephemeral shells).
    #[must_use]
    pub fn in_memory(session: Session) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self {
            path: PathBuf::new(),
            tx,
        }
    }

    /// Subscribe to session changes.
    #[must_use]
    pub fn subscribe(&self) -> SessionWatch {
        self.tx.subscribe()
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Persist a new session and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub async fn sign_in(&self, session: Session) -> Result<(), SessionError> {
        if self.is_persistent() {
            write_session(&self.path, &session).await?;
        }
        tracing::info!(username = ?session.username(), "Session stored");
        self.tx.send_replace(session);
        Ok(())
    }

    /// Clear the persisted session wholesale and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if self.is_persistent() {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SessionError::Io {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
        tracing::info!("Session cleared");
        self.tx.send_replace(Session::default());
        Ok(())
    }

    /// Location of the session file (empty for in-memory stores).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_persistent(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }
}

async fn read_session(path: &Path) -> Result<Session, SessionError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Session::default()),
        Err(source) => {
            return Err(SessionError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let stored: StoredSession = serde_json::from_str(&raw)?;
    Ok(stored.into())
}

async fn write_session(path: &Path, session: &Session) -> Result<(), SessionError> {
    let io_err = |source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(&StoredSession::from(session))?;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    // Owner-only: the file holds a bearer token
    #[cfg(unix)]
    options.mode(SESSION_FILE_MODE);

    let mut file = options.open(path).await.map_err(io_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // `mode` only applies on creation; tighten files written before
        file.set_permissions(std::fs::Permissions::from_mode(SESSION_FILE_MODE))
            .await
            .map_err(io_err)?;
    }
    file.write_all(json.as_bytes()).await.map_err(io_err)?;
    file.flush().await.map_err(io_err)
}
