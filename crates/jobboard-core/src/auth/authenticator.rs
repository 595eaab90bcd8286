//! Credential login against the backend identity endpoint.

use serde_json::Value;
use tracing::{info, warn};

use crate::api::ApiClient;

use super::{AuthError, Credentials, Session};

const LOGIN_PATH: &str = "auth/user/login";

/// Exchanges credentials for a `Session`.
///
/// Makes exactly one request per call. There is no retry and no caching.
/// Input is expected to be validated by the caller.
#[derive(Clone)]
pub struct Authenticator {
    api: ApiClient,
}

impl Authenticator {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let url = self.api.url(LOGIN_PATH);

        let response = match self.api.http().post(&url).json(credentials).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login request failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, email = %credentials.email, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to read login response");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let identity: Value =
            serde_json::from_str(&body).map_err(|_| AuthError::IncompleteIdentity("identity"))?;
        let session = session_from_identity(&identity)?;

        info!(subject_id = %session.subject_id(), "Login successful");
        Ok(session)
    }
}

/// Build a session from the login reply, coercing each identity field to
/// a string. Missing, null or structured values are rejected.
fn session_from_identity(identity: &Value) -> Result<Session, AuthError> {
    let id = coerce_field(identity, "id")?;
    let email = coerce_field(identity, "email")?;
    let token = coerce_field(identity, "token")?;
    Ok(Session::new(id, email, token))
}

fn coerce_field(identity: &Value, field: &'static str) -> Result<String, AuthError> {
    match identity.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        _ => Err(AuthError::IncompleteIdentity(field)),
    }
}
