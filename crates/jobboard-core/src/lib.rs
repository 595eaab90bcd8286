//! Core library for jobboard.
//!
//! Provides the pieces a jobboard front end needs to talk to the backend:
//!
//! - `api`: HTTP client for the job-board REST API
//! - `auth`: credential login, signed session tokens and their storage
//! - `upload`: streaming video upload with progress tracking
//! - `profile`: profile loading, editing and the upload-then-refetch flow
//! - `offers`: job offer search filtering
//! - `validation`: form-level input checks performed before calling the core

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod offers;
pub mod profile;
pub mod upload;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, Authenticator, Credentials, Session};
pub use config::Config;
pub use offers::OfferFilter;
pub use profile::{ProfileService, VideoUploadReport};
pub use upload::{ResourceUrl, UploadError, UploadJob, UploadState, UploadTracker, VideoFile};
