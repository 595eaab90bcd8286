//! Input validation performed by callers before invoking the core.
//!
//! The authenticator and API client trust their inputs; front ends run
//! these checks first and show the message next to the offending field.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{CompanyRegistration, NewOffer};

/// Minimum password length accepted by the backend
pub const MIN_PASSWORD_LENGTH: usize = 8;

const MAX_EMAIL_LENGTH: usize = 254;
const MIN_COMPANY_NAME_LENGTH: usize = 2;
const MIN_NIT_LENGTH: usize = 9;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email is required"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::new(
            "email",
            format!("Email must be at most {} characters long", MAX_EMAIL_LENGTH),
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ValidationError::new("email", "Enter a valid email address"));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

/// Login form: syntactically valid email and a long enough password.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)
}

/// Company sign-up form, including the password confirmation which is not
/// part of the request body.
pub fn validate_company_registration(
    registration: &CompanyRegistration,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if registration.name.trim().chars().count() < MIN_COMPANY_NAME_LENGTH {
        return Err(ValidationError::new(
            "name",
            format!("Company name must be at least {} characters long", MIN_COMPANY_NAME_LENGTH),
        ));
    }
    if registration.nit.trim().chars().count() < MIN_NIT_LENGTH {
        return Err(ValidationError::new(
            "nit",
            format!("NIT must be at least {} characters long", MIN_NIT_LENGTH),
        ));
    }
    validate_email(&registration.email)?;
    validate_password(&registration.password)?;
    if registration.password != confirm_password {
        return Err(ValidationError::new("confirm_password", "Passwords do not match"));
    }
    Ok(())
}

/// Every offer field is required.
pub fn validate_new_offer(offer: &NewOffer) -> Result<(), ValidationError> {
    let fields: [(&'static str, &str, &str); 8] = [
        ("title", offer.title.as_str(), "Title is required"),
        ("description", offer.description.as_str(), "Description is required"),
        ("salary", offer.salary.as_str(), "Salary is required"),
        ("type_of_contract", offer.type_of_contract.as_str(), "Contract type is required"),
        ("schedule", offer.schedule.as_str(), "Schedule is required"),
        ("modality", offer.modality.as_str(), "Modality is required"),
        ("requirements", offer.requirements.as_str(), "Requirements are required"),
        ("experience", offer.experience.as_str(), "Required experience is required"),
    ];

    for (field, value, message) in fields {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, message));
        }
    }
    Ok(())
}
