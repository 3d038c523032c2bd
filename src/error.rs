use thiserror::Error;

/// Failure of a single call against the remote issue tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("ticket title cannot be empty")]
    EmptyTitle,

    #[error("failed to create issue: {0}")]
    CreateFailed(#[source] TrackerError),
}
