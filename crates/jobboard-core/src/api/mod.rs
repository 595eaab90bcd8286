//! REST API client module for the job-board backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to register companies, read and edit user profiles, and
//! list or publish job offers.
//!
//! Authenticated calls take an explicit `Session`; the backend token it
//! carries is forwarded verbatim as a bearer token.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
