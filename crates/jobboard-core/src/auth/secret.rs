use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keyring::Entry;
use rand::RngCore;
use tracing::{debug, info, warn};

use super::session::write_private;

const SERVICE_NAME: &str = "jobboard";

const SECRET_ACCOUNT: &str = "session-secret";

/// Fallback secret file in the cache directory, used without a keychain
const SECRET_FILE: &str = "session.key";

/// Environment variable that supplies the session signing secret directly
pub const SESSION_SECRET_ENV: &str = "JOBBOARD_SESSION_SECRET";

/// Number of random bytes in a generated signing secret
const SECRET_BYTES: usize = 32;

/// Resolves the secret used to sign session tokens.
///
/// The secret must be the same on every run, or sessions saved earlier
/// no longer verify.
pub struct SecretStore {
    use_keychain: bool,
    secret_file: PathBuf,
}

impl SecretStore {
    /// Keychain first, with `{cache_dir}/session.key` as the fallback
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            use_keychain: true,
            secret_file: cache_dir.join(SECRET_FILE),
        }
    }

    /// Keep the secret only in `{cache_dir}/session.key`
    pub fn file_only(cache_dir: &Path) -> Self {
        Self {
            use_keychain: false,
            secret_file: cache_dir.join(SECRET_FILE),
        }
    }

    /// Environment first, then the OS keychain, then the secret file. If
    /// none has one, a new secret is generated and stored in the keychain,
    /// or in the secret file when the keychain is unavailable.
    pub fn resolve(&self) -> Result<Vec<u8>> {
        if let Some(secret) = Self::from_env() {
            debug!("Using session secret from environment");
            return Ok(secret);
        }

        if self.use_keychain {
            match Self::keychain_get() {
                Ok(Some(secret)) => {
                    debug!("Using session secret from keychain");
                    return Ok(secret.into_bytes());
                }
                Ok(None) => {
                    let secret = match self.read_file()? {
                        Some(secret) => secret,
                        None => Self::generate(),
                    };
                    match Self::keychain_set(&secret) {
                        Ok(()) => {
                            info!("Session secret stored in keychain");
                            return Ok(secret.into_bytes());
                        }
                        Err(e) => {
                            warn!(error = %e, "Keychain unavailable, keeping session secret in a file");
                            self.write_file(&secret)?;
                            return Ok(secret.into_bytes());
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Keychain unavailable, using session secret file");
                }
            }
        }

        self.resolve_from_file()
    }

    /// Delete the stored secret, invalidating every session signed with it
    pub fn rotate(&self) -> Result<()> {
        if self.use_keychain {
            if let Err(e) = Self::keychain_delete() {
                warn!(error = %e, "Failed to delete session secret from keychain");
            }
        }
        if self.secret_file.exists() {
            std::fs::remove_file(&self.secret_file)
                .with_context(|| format!("Failed to remove {}", self.secret_file.display()))?;
        }
        Ok(())
    }

    fn resolve_from_file(&self) -> Result<Vec<u8>> {
        if let Some(secret) = self.read_file()? {
            debug!(path = %self.secret_file.display(), "Using session secret from file");
            return Ok(secret.into_bytes());
        }

        let secret = Self::generate();
        self.write_file(&secret)?;
        info!(path = %self.secret_file.display(), "Generated new session secret");
        Ok(secret.into_bytes())
    }

    fn read_file(&self) -> Result<Option<String>> {
        if !self.secret_file.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.secret_file)
            .with_context(|| format!("Failed to read {}", self.secret_file.display()))?;
        let secret = contents.trim();
        Ok((!secret.is_empty()).then(|| secret.to_string()))
    }

    fn write_file(&self, secret: &str) -> Result<()> {
        if let Some(parent) = self.secret_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_private(&self.secret_file, secret)
    }

    fn keychain_get() -> Result<Option<String>> {
        let entry = Entry::new(SERVICE_NAME, SECRET_ACCOUNT).context("Failed to create keyring entry")?;
        match entry.get_password() {
            Ok(secret) if !secret.trim().is_empty() => Ok(Some(secret)),
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read session secret from keychain"),
        }
    }

    fn keychain_set(secret: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, SECRET_ACCOUNT).context("Failed to create keyring entry")?;
        entry
            .set_password(secret)
            .context("Failed to store session secret in keychain")
    }

    fn keychain_delete() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, SECRET_ACCOUNT).context("Failed to create keyring entry")?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete session secret from keychain"),
        }
    }

    fn from_env() -> Option<Vec<u8>> {
        std::env::var(SESSION_SECRET_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(String::into_bytes)
    }

    /// Hex-encoded random secret
    fn generate() -> String {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Session, SessionSigner, SessionStore};

    #[test]
    fn test_generated_secret_shape() {
        let a = SecretStore::generate();
        let b = SecretStore::generate();
        assert_eq!(a.len(), SECRET_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_secret_is_stable_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let first = SecretStore::file_only(dir.path()).resolve().unwrap();
        let second = SecretStore::file_only(dir.path()).resolve().unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let max_age = chrono::Duration::hours(24);
        let session = Session::new("42", "a@b.com", "tok");

        // First run: log in and save
        let secret = SecretStore::file_only(dir.path()).resolve().unwrap();
        SessionStore::new(dir.path().to_path_buf(), SessionSigner::new(&secret), max_age)
            .save(&session)
            .unwrap();

        // Second run: everything rebuilt from disk
        let secret = SecretStore::file_only(dir.path()).resolve().unwrap();
        let restored = SessionStore::new(dir.path().to_path_buf(), SessionSigner::new(&secret), max_age)
            .load()
            .unwrap()
            .expect("session should be restored");
        assert_eq!(restored.session, session);
    }

    #[test]
    fn test_rotate_invalidates_saved_session() {
        let dir = tempfile::tempdir().unwrap();
        let max_age = chrono::Duration::hours(24);

        let secrets = SecretStore::file_only(dir.path());
        let secret = secrets.resolve().unwrap();
        SessionStore::new(dir.path().to_path_buf(), SessionSigner::new(&secret), max_age)
            .save(&Session::new("42", "a@b.com", "tok"))
            .unwrap();

        secrets.rotate().unwrap();
        let rotated = secrets.resolve().unwrap();
        if std::env::var(SESSION_SECRET_ENV).is_err() {
            assert_ne!(secret, rotated);
            let store = SessionStore::new(dir.path().to_path_buf(), SessionSigner::new(&rotated), max_age);
            assert!(store.load().unwrap().is_none());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_secret_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        if std::env::var(SESSION_SECRET_ENV).is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        SecretStore::file_only(dir.path()).resolve().unwrap();
        let mode = std::fs::metadata(dir.path().join(SECRET_FILE)).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
