//! Profile workflows for the signed-in user.
//!
//! `ProfileService` ties the API client and the upload tracker together.
//! After every video upload, whatever the outcome, the profile is fetched
//! again so callers always display what the backend holds.

use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::Session;
use crate::models::{ProfileUpdate, UserProfile};
use crate::upload::{ResourceUrl, UploadError, UploadJob, UploadTracker, VideoFile};

/// Outcome of `ProfileService::upload_video`
#[derive(Debug)]
pub struct VideoUploadReport {
    /// Result of the transfer itself
    pub upload: Result<ResourceUrl, UploadError>,
    /// Profile re-read after the transfer
    pub profile: Result<UserProfile, ApiError>,
    /// Progress the job had reached when it finished
    pub final_progress: u8,
}

#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
    tracker: UploadTracker,
}

impl ProfileService {
    pub fn new(api: ApiClient, tracker: UploadTracker) -> Self {
        Self { api, tracker }
    }

    pub async fn load(&self, session: &Session) -> Result<UserProfile, ApiError> {
        self.api.fetch_profile(session).await
    }

    /// Save edited fields. An empty edit is not sent; the current profile
    /// is returned instead.
    pub async fn save_edits(&self, session: &Session, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        if update.is_empty() {
            debug!("No profile changes to save");
            return self.load(session).await;
        }
        self.api.update_profile(session, update).await
    }

    /// Upload a presentation video for the session's subject, then re-fetch
    /// the profile.
    pub async fn upload_video<F>(&self, session: &Session, file: VideoFile, on_progress: F) -> VideoUploadReport
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let mut job = UploadJob::new(file, session.subject_id());
        let upload = self.tracker.upload(session, &mut job, on_progress).await;

        let profile = self.load(session).await;
        if let Err(ref e) = profile {
            warn!(error = %e, "Failed to refresh profile after upload");
        }

        VideoUploadReport {
            upload,
            profile,
            final_progress: job.progress_percent(),
        }
    }
}
