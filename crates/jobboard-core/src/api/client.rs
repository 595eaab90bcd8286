//! API client for communicating with the job-board REST API.
//!
//! This module provides the `ApiClient` struct for making API requests
//! to register companies, manage user profiles and list job offers.
//! Login and video uploads live in `auth` and `upload` and reuse this
//! client's connection pool.

use anyhow::Result;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::config::Config;
use crate::models::{CompanyRegistration, JobOffer, NewOffer, ProfileUpdate, UserProfile};

use super::error::EMAIL_EXISTS_SENTINEL;
use super::ApiError;

// ============================================================================
// Endpoints
// ============================================================================

const COMPANY_REGISTER_PATH: &str = "auth/companies/register";
const USERS_PATH: &str = "users";
const OFFERS_PATH: &str = "oferts";

/// Body of a registration response; only the error field matters.
#[derive(Debug, Deserialize)]
struct RegistrationReply {
    error: Option<String>,
}

/// API client for the job-board backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from the loaded configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config.base_url(), config.request_timeout())
    }

    /// Create a client for an explicit base URL (e.g. `http://host:3001/api`)
    pub fn with_base_url(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a relative endpoint path onto the base URL
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Attach the session's backend token, verbatim, as a bearer token.
    pub(crate) fn authorize(request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        match session {
            Some(session) => request.bearer_auth(session.token()),
            None => request,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(url = url, error = %e, "Failed to parse JSON response");
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, session: Option<&Session>) -> Result<T, ApiError> {
        let request = Self::authorize(self.client.get(url), session);
        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, url).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<T, ApiError> {
        let request = Self::authorize(self.client.patch(url).json(body), session);
        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, url).await
    }

    // ===== Registration =====

    /// Register a company account.
    ///
    /// The duplicate-email sentinel in the body wins over the status code,
    /// so a "created" status carrying the sentinel is still reported as a
    /// duplicate.
    pub async fn register_company(&self, registration: &CompanyRegistration) -> Result<(), ApiError> {
        let url = self.url(COMPANY_REGISTER_PATH);

        let response = self.client.post(&url).json(registration).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(RegistrationReply { error: Some(error) }) = serde_json::from_str::<RegistrationReply>(&body) {
            if error == EMAIL_EXISTS_SENTINEL {
                info!(email = %registration.email, "Company registration rejected: email exists");
                return Err(ApiError::EmailAlreadyExists);
            }
            if status.is_success() {
                warn!(status = %status, error = %error, "Registration succeeded with an error body");
            }
        }

        if status.is_success() {
            info!(email = %registration.email, "Company registered");
            Ok(())
        } else {
            Err(ApiError::from_status(status, &body))
        }
    }

    // ===== Profiles =====

    /// Fetch the profile of the session's subject
    pub async fn fetch_profile(&self, session: &Session) -> Result<UserProfile, ApiError> {
        let url = self.url(&format!("{}/{}", USERS_PATH, session.subject_id()));
        self.get(&url, Some(session)).await
    }

    /// Apply a partial update and return the backend's updated profile
    pub async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let url = self.url(&format!("{}/{}", USERS_PATH, session.subject_id()));
        self.patch(&url, update, Some(session)).await
    }

    // ===== Offers =====

    /// Fetch all published job offers
    pub async fn fetch_offers(&self) -> Result<Vec<JobOffer>, ApiError> {
        let url = self.url(OFFERS_PATH);
        let offers: Vec<JobOffer> = self.get(&url, None).await?;
        debug!(count = offers.len(), "Fetched job offers");
        Ok(offers)
    }

    /// Publish a new job offer.
    ///
    /// Returns the created offer when the backend echoes it back in a
    /// recognizable shape.
    pub async fn create_offer(&self, session: Option<&Session>, offer: &NewOffer) -> Result<Option<JobOffer>, ApiError> {
        let url = self.url(OFFERS_PATH);
        let request = Self::authorize(self.client.post(&url).json(offer), session);
        let response = request.send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        match serde_json::from_str::<JobOffer>(&text) {
            Ok(created) => {
                info!(offer_id = %created.id, "Job offer created");
                Ok(Some(created))
            }
            Err(e) => {
                debug!(error = %e, "Create offer response did not contain an offer");
                Ok(None)
            }
        }
    }
}
