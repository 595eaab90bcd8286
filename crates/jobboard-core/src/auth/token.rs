//! Signed session tokens.
//!
//! A session is carried between runs as an HS256 JWT holding the standard
//! claims plus the three identity fields. Verifying the signature and the
//! expiry is all that is needed to trust it again; the backend is never
//! consulted.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Session;

/// Length of the random token identifier, in bytes
const JTI_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (the backend user id)
    pub sub: String,
    /// Issued at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Unique token id
    pub jti: String,
    pub id: String,
    pub email: String,
    /// Backend token, carried verbatim
    pub token: String,
}

#[derive(Error, Debug)]
pub enum SessionTokenError {
    #[error("Session has expired")]
    Expired,

    #[error("Session token subject does not match its identity")]
    SubjectMismatch,

    #[error("Invalid session token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionSigner {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a session that stays valid for `max_age` from now
    pub fn sign(&self, session: &Session, max_age: Duration) -> Result<String, SessionTokenError> {
        self.sign_at(session, Utc::now(), max_age)
    }

    pub fn sign_at(
        &self,
        session: &Session,
        issued_at: DateTime<Utc>,
        max_age: Duration,
    ) -> Result<String, SessionTokenError> {
        let mut jti = [0u8; JTI_BYTES];
        rand::thread_rng().fill_bytes(&mut jti);

        let claims = SessionClaims {
            sub: session.subject_id().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + max_age).timestamp(),
            jti: hex::encode(jti),
            id: session.subject_id().to_string(),
            email: session.email().to_string(),
            token: session.token().to_string(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry, then re-derive the session
    pub fn verify(&self, token: &str) -> Result<(Session, SessionClaims), SessionTokenError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionTokenError::Expired,
                _ => SessionTokenError::Invalid(e),
            })?
            .claims;

        if claims.sub != claims.id {
            return Err(SessionTokenError::SubjectMismatch);
        }

        let session = Session::new(claims.id.clone(), claims.email.clone(), claims.token.clone());
        Ok((session, claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("42", "a@b.com", "tok")
    }

    #[test]
    fn test_sign_then_verify() {
        let signer = SessionSigner::new(b"test-secret");
        let token = signer.sign(&session(), Duration::hours(1)).unwrap();

        let (restored, claims) = signer.verify(&token).unwrap();
        assert_eq!(restored, session());
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.jti.len(), JTI_BYTES * 2);
    }

    #[test]
    fn test_each_token_has_a_fresh_jti() {
        let signer = SessionSigner::new(b"test-secret");
        let a = signer.sign(&session(), Duration::hours(1)).unwrap();
        let b = signer.sign(&session(), Duration::hours(1)).unwrap();
        assert_ne!(signer.verify(&a).unwrap().1.jti, signer.verify(&b).unwrap().1.jti);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let signer = SessionSigner::new(b"test-secret");
        let issued = Utc::now() - Duration::hours(3);
        let token = signer.sign_at(&session(), issued, Duration::hours(1)).unwrap();

        assert!(matches!(signer.verify(&token), Err(SessionTokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = SessionSigner::new(b"secret-a").sign(&session(), Duration::hours(1)).unwrap();
        let other = SessionSigner::new(b"secret-b");
        assert!(matches!(other.verify(&token), Err(SessionTokenError::Invalid(_))));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let signer = SessionSigner::new(b"test-secret");
        let token = signer.sign(&session(), Duration::hours(1)).unwrap();

        // Swap the payload for one signed with a different key
        let forged = SessionSigner::new(b"attacker")
            .sign(&Session::new("1", "admin@b.com", "stolen"), Duration::hours(1))
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(signer.verify(&spliced).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let signer = SessionSigner::new(b"test-secret");
        assert!(matches!(signer.verify("not.a.token"), Err(SessionTokenError::Invalid(_))));
    }
}
