use thiserror::Error;

pub const INGEST_FAILURE_MESSAGE: &str = "Failed to upload files. Check backend.";
pub const QUERY_FAILURE_MESSAGE: &str = "Error connecting to the AI. Is the backend running?";

/// Rejections raised while curating the candidate set. Display text is the
/// operator-facing notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Maximum of {limit} files allowed.")]
    MaxCountExceeded { limit: usize },
    #[error("This file has already been added.")]
    DuplicateName { display_name: String },
    #[error("No document at position {index} (set holds {len}).")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("ingest transport failure: {0}")]
    Transport(String),
    #[error("ingest rejected with status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
    #[error("invalid ingest response: {0}")]
    Decode(String),
    #[error("ingest cancelled")]
    Cancelled,
    #[error("ingest backend unavailable")]
    Unavailable,
}

impl IngestError {
    pub fn user_message(&self) -> &'static str {
        INGEST_FAILURE_MESSAGE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query transport failure: {0}")]
    Transport(String),
    #[error("query rejected with status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
    #[error("invalid query response: {0}")]
    Decode(String),
    #[error("query cancelled")]
    Cancelled,
    #[error("query backend unavailable")]
    Unavailable,
}

impl QueryError {
    pub fn user_message(&self) -> &'static str {
        QUERY_FAILURE_MESSAGE
    }
}
