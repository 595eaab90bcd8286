use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, warn};

use super::token::{SessionSigner, SessionTokenError};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.jwt";

/// An authenticated identity.
///
/// `token` is the backend's credential. It is opaque to the client and is
/// forwarded as-is on authenticated requests, never parsed or reissued.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    subject_id: String,
    email: String,
    token: String,
}

impl Session {
    pub fn new(subject_id: impl Into<String>, email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            token: token.into(),
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("subject_id", &self.subject_id)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A session restored from disk together with its expiry
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub session: Session,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at - Utc::now()
    }

    /// Get hours remaining until expiry (for display)
    pub fn hours_until_expiry(&self) -> i64 {
        self.time_until_expiry().num_hours().max(0)
    }
}

/// Keeps the signed session token on disk between runs.
pub struct SessionStore {
    cache_dir: PathBuf,
    signer: SessionSigner,
    max_age: Duration,
}

impl SessionStore {
    pub fn new(cache_dir: PathBuf, signer: SessionSigner, max_age: Duration) -> Self {
        Self {
            cache_dir,
            signer,
            max_age,
        }
    }

    /// Load and verify the stored session.
    ///
    /// Returns `Ok(None)` when there is no session or the stored token is
    /// expired or fails verification; such a token is removed.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let token = std::fs::read_to_string(&path).context("Failed to read session file")?;

        match self.signer.verify(token.trim()) {
            Ok((session, claims)) => {
                let expires_at = Utc
                    .timestamp_opt(claims.exp, 0)
                    .single()
                    .unwrap_or_else(Utc::now);
                debug!(subject_id = %session.subject_id(), %expires_at, "Session restored");
                Ok(Some(StoredSession { session, expires_at }))
            }
            Err(SessionTokenError::Expired) => {
                debug!("Stored session expired");
                self.clear()?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Discarding unverifiable session");
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Sign the session and save it to disk
    pub fn save(&self, session: &Session) -> Result<()> {
        let token = self
            .signer
            .sign(session, self.max_age)
            .context("Failed to sign session")?;

        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_private(&path, &token)?;
        debug!(subject_id = %session.subject_id(), "Session saved");
        Ok(())
    }

    /// Remove the local session. The signed token itself stays valid until
    /// it expires; there is no server-side revocation.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

/// Write a file readable only by the owner
#[cfg(unix)]
pub(super) fn write_private(path: &Path, contents: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(not(unix))]
pub(super) fn write_private(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path, secret: &[u8]) -> SessionStore {
        SessionStore::new(dir.to_path_buf(), SessionSigner::new(secret), Duration::hours(24))
    }

    #[test]
    fn test_load_without_session() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(dir.path(), b"s").load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), b"s");
        let session = Session::new("42", "a@b.com", "tok");

        store.save(&session).unwrap();
        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.session, session);
        assert!(stored.hours_until_expiry() >= 23);
    }

    #[test]
    fn test_tampered_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        store(dir.path(), b"secret-a")
            .save(&Session::new("42", "a@b.com", "tok"))
            .unwrap();

        let other = store(dir.path(), b"secret-b");
        assert!(other.load().unwrap().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn test_expired_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let signer = SessionSigner::new(b"s");
        let token = signer
            .sign_at(
                &Session::new("42", "a@b.com", "tok"),
                Utc::now() - Duration::days(2),
                Duration::hours(1),
            )
            .unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), token).unwrap();

        assert!(store(dir.path(), b"s").load().unwrap().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), b"s");
        store.save(&Session::new("42", "a@b.com", "tok")).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("42", "a@b.com", "super-secret-token");
        assert!(!format!("{:?}", session).contains("super-secret-token"));
    }
}
