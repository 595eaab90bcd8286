use serde::{Deserialize, Serialize};

use crate::utils::format_date;

/// Candidate profile as returned by `GET /users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "super::lenient_id")]
    pub id: String,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.name.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        parts.join(" ")
    }

    pub fn has_video(&self) -> bool {
        self.video.as_deref().map(|v| !v.is_empty()).unwrap_or(false)
    }

    pub fn registered_display(&self) -> String {
        self.registration_date
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Partial body for `PATCH /users/{id}`. Only the editable fields are
/// carried, and unset fields are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.experience.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_json() -> &'static str {
        r#"{
            "id": 7,
            "registration_date": "2024-03-01T10:00:00Z",
            "name": "Ana",
            "lastname": "Gomez",
            "email": "ana@example.com",
            "gender": "F",
            "experience": "5 years",
            "description": "Backend developer",
            "video": ""
        }"#
    }

    #[test]
    fn test_parse_profile_with_numeric_id() {
        let profile: UserProfile = serde_json::from_str(profile_json()).unwrap();
        assert_eq!(profile.id, "7");
        assert_eq!(profile.full_name(), "Ana Gomez");
        assert!(!profile.has_video());
        assert_eq!(profile.registered_display(), "Mar 01, 2024");
    }

    #[test]
    fn test_parse_profile_missing_optional_fields() {
        let profile: UserProfile = serde_json::from_str(r#"{"id": "abc", "name": "Ana"}"#).unwrap();
        assert_eq!(profile.full_name(), "Ana");
        assert_eq!(profile.registered_display(), "Unknown");
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            description: Some("New".to_string()),
            experience: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"description": "New"}));
        assert!(ProfileUpdate::default().is_empty());
    }
}
