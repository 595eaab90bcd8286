//! Data models for job-board entities.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `UserProfile`, `ProfileUpdate`: candidate profile and its partial edits
//! - `CompanyRegistration`: company sign-up payload
//! - `JobOffer`, `NewOffer`: published offers and the creation payload

pub mod company;
pub mod offer;
pub mod user;

pub use company::CompanyRegistration;
pub use offer::{JobOffer, NewOffer};
pub use user::{ProfileUpdate, UserProfile};

use serde::{Deserialize, Deserializer};

/// Accept an identifier the backend may send as a string or a number.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {}", other))),
    }
}

/// Like `lenient_id` but for optional references such as `companyId`.
pub(crate) fn lenient_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}
