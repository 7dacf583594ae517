//! Upload/ingest lifecycle.
//!
//! A submission is split into [`IngestionController::begin`] and
//! [`IngestionController::complete`] so the caller can release its state lock
//! while the backend call is outstanding. The `Uploading` state doubles as the
//! reentrancy guard: only one ticket exists at a time.

use shared::{domain::Document, error::IngestError, protocol::IngestStats};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IngestionState {
    #[default]
    Idle,
    Uploading,
    Succeeded(IngestStats),
    Failed(String),
}

impl IngestionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_ready() {
            "Ready"
        } else {
            "Waiting for Data"
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            Self::Uploading => "Processing...",
            Self::Succeeded(_) => "Ingested (Click to Retry)",
            Self::Idle | Self::Failed(_) => "Ingest All Documents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("no documents to ingest")]
    EmptySet,
    #[error("an ingestion is already in progress")]
    AlreadyUploading,
}

/// Proof of an in-flight submission, carrying the documents snapshot that
/// was handed to the backend.
#[derive(Debug)]
pub struct IngestTicket {
    attempt: u64,
    documents: Vec<Document>,
}

impl IngestTicket {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Succeeded(IngestStats),
    Failed(IngestError),
    /// The document set changed while the attempt was in flight; its verdict
    /// was discarded and the controller is back to `Idle`.
    Superseded,
}

#[derive(Debug, Default)]
pub struct IngestionController {
    state: IngestionState,
    attempt: u64,
    stale: bool,
}

impl IngestionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &IngestionState {
        &self.state
    }

    pub fn is_uploading(&self) -> bool {
        self.state == IngestionState::Uploading
    }

    pub fn begin(&mut self, documents: &[Document]) -> Result<IngestTicket, SubmitRejection> {
        if documents.is_empty() {
            return Err(SubmitRejection::EmptySet);
        }
        if self.is_uploading() {
            return Err(SubmitRejection::AlreadyUploading);
        }

        self.attempt += 1;
        self.stale = false;
        self.state = IngestionState::Uploading;
        Ok(IngestTicket {
            attempt: self.attempt,
            documents: documents.to_vec(),
        })
    }

    pub fn complete(
        &mut self,
        ticket: IngestTicket,
        result: Result<IngestStats, IngestError>,
    ) -> Completion {
        if ticket.attempt != self.attempt || !self.is_uploading() {
            tracing::warn!(
                attempt = ticket.attempt,
                current = self.attempt,
                "ingest: ignoring completion for unknown attempt"
            );
            return Completion::Superseded;
        }

        if self.stale {
            self.stale = false;
            self.state = IngestionState::Idle;
            return Completion::Superseded;
        }

        match result {
            Ok(stats) => {
                self.state = IngestionState::Succeeded(stats.clone());
                Completion::Succeeded(stats)
            }
            Err(err) => {
                self.state = IngestionState::Failed(err.user_message().to_string());
                Completion::Failed(err)
            }
        }
    }

    /// Invalidates the current verdict after the document set changed. An
    /// in-flight attempt keeps the guard armed and resolves to `Idle`.
    pub fn reset(&mut self) {
        if self.is_uploading() {
            self.stale = true;
        } else {
            self.state = IngestionState::Idle;
        }
    }
}

#[cfg(test)]
#[path = "tests/ingestion_tests.rs"]
mod tests;
