use serde::{Deserialize, Serialize};

use crate::utils::format_date;

/// A published job offer from `GET /oferts`.
///
/// Wire names follow the backend, including its spellings
/// (`typeOfcontract`, `requeriments`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOffer {
    #[serde(deserialize_with = "super::lenient_id")]
    pub id: String,
    #[serde(default)]
    pub publication_date: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary: String,
    #[serde(rename = "companyId", default, deserialize_with = "super::lenient_opt_id")]
    pub company_id: Option<String>,
    #[serde(rename = "typeOfcontract", default)]
    pub type_of_contract: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub modality: String,
    #[serde(rename = "requeriments", default)]
    pub requirements: String,
    #[serde(default)]
    pub experience: String,
}

impl JobOffer {
    pub fn published_display(&self) -> String {
        self.publication_date
            .as_deref()
            .map(format_date)
            .unwrap_or_default()
    }
}

/// Body for `POST /oferts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOffer {
    pub title: String,
    pub description: String,
    pub salary: String,
    #[serde(rename = "typeOfcontract")]
    pub type_of_contract: String,
    pub schedule: String,
    pub modality: String,
    #[serde(rename = "requeriments")]
    pub requirements: String,
    pub experience: String,
}
