//! Video upload with progress tracking.
//!
//! This module provides:
//! - `VideoFile`: a selected local video, validated when it is picked
//! - `UploadJob`: one transfer attempt, its progress and state
//! - `UploadTracker`: streams a job to the backend as a multipart body and
//!   reports progress as the transport consumes it
//!
//! A job is uploaded at most once. After a failure the caller discards the
//! job and starts a new one; nothing is retried automatically.

pub mod error;
pub mod job;
pub mod progress;
pub mod selection;
pub mod tracker;

pub use error::{SelectionError, UploadError};
pub use job::{UploadJob, UploadState};
pub use progress::percent_complete;
pub use selection::VideoFile;
pub use tracker::{ResourceUrl, UploadTracker};
