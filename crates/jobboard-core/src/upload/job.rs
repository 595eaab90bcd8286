use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::VideoFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

/// One attempt at uploading a video for an owner.
///
/// Progress is shared with the tracker while the body is streaming, so it
/// can be read at any time. The job is informational only; the owner's
/// profile on the backend is the source of truth.
#[derive(Debug)]
pub struct UploadJob {
    file: VideoFile,
    owner_id: String,
    progress: Arc<AtomicU8>,
    state: UploadState,
}

impl UploadJob {
    pub fn new(file: VideoFile, owner_id: impl Into<String>) -> Self {
        Self {
            file,
            owner_id: owner_id.into(),
            progress: Arc::new(AtomicU8::new(0)),
            state: UploadState::Pending,
        }
    }

    pub fn file(&self) -> &VideoFile {
        &self.file
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub(crate) fn progress_handle(&self) -> Arc<AtomicU8> {
        Arc::clone(&self.progress)
    }

    pub(crate) fn set_state(&mut self, state: UploadState) {
        self.state = state;
    }
}
