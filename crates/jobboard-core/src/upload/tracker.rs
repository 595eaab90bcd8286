//! Streaming multipart upload to the owner's video endpoint.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::auth::Session;
use crate::config::Config;

use super::progress::ProgressCounter;
use super::{UploadError, UploadJob, UploadState};

const VIDEO_UPLOAD_PATH: &str = "users/video";

/// Multipart field name the backend reads the file from
const FILE_FIELD: &str = "file";

/// Locator of an uploaded asset, as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUrl(String);

impl ResourceUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accept either a JSON string body or plain text
    fn from_body(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        let url = serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| trimmed.to_string());
        if url.is_empty() {
            None
        } else {
            Some(Self(url))
        }
    }
}

impl std::fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uploads `UploadJob`s, reporting progress while the body streams out.
#[derive(Clone)]
pub struct UploadTracker {
    api: ApiClient,
    chunk_size: usize,
    timeout: Duration,
}

impl UploadTracker {
    pub fn new(api: ApiClient, config: &Config) -> Self {
        Self::with_options(api, config.upload_chunk_size, config.upload_timeout())
    }

    pub fn with_options(api: ApiClient, chunk_size: usize, timeout: Duration) -> Self {
        Self {
            api,
            chunk_size: chunk_size.max(1),
            timeout,
        }
    }

    /// Upload the job's file to `POST /users/video/{owner_id}`.
    ///
    /// `on_progress` receives non-decreasing percentages in `0..=100`; a
    /// successful upload always ends with 100. On failure the job is marked
    /// `Failed` and keeps the progress it reached.
    pub async fn upload<F>(
        &self,
        session: &Session,
        job: &mut UploadJob,
        on_progress: F,
    ) -> Result<ResourceUrl, UploadError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        if job.state() != UploadState::Pending {
            return Err(UploadError::AlreadyStarted);
        }

        let file = job.file().clone();
        let counter = Arc::new(ProgressCounter::new(
            file.size(),
            job.progress_handle(),
            Box::new(on_progress),
        ));

        job.set_state(UploadState::InProgress);
        counter.start();
        info!(
            owner_id = %job.owner_id(),
            file = %file.file_name(),
            size = file.size(),
            "Starting video upload"
        );

        let stream_counter = Arc::clone(&counter);
        let body_stream = file.chunks(self.chunk_size).map(move |chunk| {
            if let Ok(ref bytes) = chunk {
                stream_counter.record(bytes.len());
            }
            chunk
        });

        let part = Part::stream_with_length(Body::wrap_stream(body_stream), file.size())
            .file_name(file.file_name().to_string())
            .mime_str(file.content_type());
        let part = match part {
            Ok(part) => part,
            Err(e) => return Err(Self::fail(job, e.into())),
        };
        let form = Form::new().part(FILE_FIELD, part);

        let url = self.api.url(&format!("{}/{}", VIDEO_UPLOAD_PATH, job.owner_id()));
        let request = ApiClient::authorize(self.api.http().post(&url), Some(session))
            .multipart(form)
            .timeout(self.timeout);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(Self::fail(job, e.into())),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Err(Self::fail(job, e.into())),
        };

        if !status.is_success() {
            warn!(status = %status, "Video upload rejected");
            return Err(Self::fail(
                job,
                UploadError::TransportFailure(format!("server responded with status {}", status)),
            ));
        }

        let Some(resource) = ResourceUrl::from_body(&body) else {
            return Err(Self::fail(
                job,
                UploadError::TransportFailure("server returned no video URL".to_string()),
            ));
        };

        counter.complete();
        job.set_state(UploadState::Succeeded);
        info!(owner_id = %job.owner_id(), url = %resource, "Video upload complete");
        Ok(resource)
    }

    fn fail(job: &mut UploadJob, err: UploadError) -> UploadError {
        error!(
            owner_id = %job.owner_id(),
            progress = job.progress_percent(),
            error = %err,
            "Video upload failed"
        );
        job.set_state(UploadState::Failed);
        debug!("Upload job left in failed state; progress not reset");
        err
    }
}
