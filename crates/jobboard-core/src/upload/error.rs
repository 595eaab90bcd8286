use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    /// The request could not be sent, was cut off, or the backend answered
    /// with a non-success status.
    #[error("Upload failed: {0}")]
    TransportFailure(String),

    #[error("Upload job was already started")]
    AlreadyStarted,
}

impl UploadError {
    pub fn user_message(&self) -> String {
        match self {
            UploadError::TransportFailure(_) => {
                "Uploading the video failed. Please try again.".to_string()
            }
            UploadError::AlreadyStarted => {
                "This video was already uploaded. Select it again to retry.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        UploadError::TransportFailure(e.to_string())
    }
}

/// Problems with the file picked for upload
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File is empty: {}", .0.display())]
    Empty(PathBuf),

    #[error("Not a video file: {}", .0.display())]
    NotVideo(PathBuf),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
