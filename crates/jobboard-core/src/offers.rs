//! Job offer search filtering.
//!
//! The backend returns every offer; narrowing happens on the client.

use crate::models::JobOffer;
use crate::utils::contains_ignore_case;

/// Client-side offer filter.
///
/// A keyword matches the title or description. A location term matches the
/// modality and widens the result (either match is enough), mirroring the
/// search results screen. Matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct OfferFilter {
    pub keyword: Option<String>,
    pub location: Option<String>,
}

impl OfferFilter {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    fn keyword_term(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    fn location_term(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_term().is_none() && self.location_term().is_none()
    }

    pub fn matches(&self, offer: &JobOffer) -> bool {
        if self.is_empty() {
            return true;
        }

        let keyword_match = self
            .keyword_term()
            .map(|k| contains_ignore_case(&offer.title, k) || contains_ignore_case(&offer.description, k))
            .unwrap_or(false);
        let location_match = self
            .location_term()
            .map(|l| contains_ignore_case(&offer.modality, l))
            .unwrap_or(false);

        keyword_match || location_match
    }

    pub fn apply<'a>(&self, offers: &'a [JobOffer]) -> Vec<&'a JobOffer> {
        offers.iter().filter(|o| self.matches(o)).collect()
    }
}
