//! Authentication module for credential login and session propagation.
//!
//! This module provides:
//! - `Authenticator`: exchanges `Credentials` with the backend for a `Session`
//! - `SessionSigner`: signs a `Session` into a stateless, tamper-evident token
//! - `SessionStore`: persists the signed token and re-derives the session
//!   on every start without asking the backend
//! - `SecretStore`: resolves the signing secret from the environment, the
//!   OS keychain or a private file in the cache directory
//!
//! A signed session cannot be revoked before it expires; logging out only
//! discards the local token.

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod secret;
pub mod session;
pub mod token;

pub use authenticator::Authenticator;
pub use credentials::Credentials;
pub use error::AuthError;
pub use secret::SecretStore;
pub use session::{Session, SessionStore, StoredSession};
pub use token::{SessionClaims, SessionSigner, SessionTokenError};
