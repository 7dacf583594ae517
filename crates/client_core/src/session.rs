//! Single owner of the four state records. Every transition goes through a
//! named method; the state lock is released before any backend call.

use std::sync::Arc;

use shared::{
    domain::{Citation, CitationRef, ConversationTurn, Document, DocumentId, DocumentUpload, TurnId},
    error::{AdmissionError, IngestError},
    protocol::{IngestStats, QueryRequest},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    citation::CitationSelector,
    conversation::{ConversationLog, ExchangeOutcome, SendRejection},
    document_set::DocumentSet,
    ingestion::{Completion, IngestionController, IngestionState, SubmitRejection},
    MissingRagBackend, RagBackend,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no citation {index} in turn {turn}")]
    UnknownCitation { turn: usize, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DocumentsChanged,
    IngestionChanged(IngestionState),
    TurnAppended(TurnId),
    GeneratingChanged(bool),
    CitationChanged(Option<CitationRef>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ingested(IngestStats),
    Skipped(SubmitRejection),
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(SendRejection),
    Answered(TurnId),
    Failed(TurnId),
}

impl From<ExchangeOutcome> for SendOutcome {
    fn from(value: ExchangeOutcome) -> Self {
        match value {
            ExchangeOutcome::Answered(turn) => Self::Answered(turn),
            ExchangeOutcome::Failed(turn) => Self::Failed(turn),
        }
    }
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub documents: Vec<Document>,
    pub admission_notice: Option<String>,
    pub ingestion: IngestionState,
    pub turns: Vec<ConversationTurn>,
    pub is_generating: bool,
    pub active_citation: Option<(CitationRef, Citation)>,
}

#[derive(Default)]
struct SessionState {
    documents: DocumentSet,
    ingestion: IngestionController,
    conversation: ConversationLog,
    citations: CitationSelector,
}

impl SessionState {
    fn active_citation(&self) -> Option<(CitationRef, Citation)> {
        let active = self.citations.current()?;
        let citation = self.conversation.citation(active)?.clone();
        Some((active, citation))
    }
}

pub struct EvidenceSession {
    backend: Arc<dyn RagBackend>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl EvidenceSession {
    pub fn new(backend: Arc<dyn RagBackend>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Self::new(Arc::new(MissingRagBackend))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    pub async fn add_document(&self, upload: DocumentUpload) -> Result<DocumentId, AdmissionError> {
        let display_name = upload.display_name.clone();
        let (id, ingestion) = {
            let mut guard = self.inner.lock().await;
            let id = match guard.documents.add(upload) {
                Ok(id) => id,
                Err(err) => {
                    debug!(document = %display_name, error = %err, "documents: admission rejected");
                    return Err(err);
                }
            };
            guard.ingestion.reset();
            (id, guard.ingestion.state().clone())
        };

        info!(document = %display_name, "documents: admitted");
        self.emit(SessionEvent::DocumentsChanged);
        self.emit(SessionEvent::IngestionChanged(ingestion));
        Ok(id)
    }

    pub async fn remove_document(&self, index: usize) -> Result<Document, AdmissionError> {
        let (result, ingestion) = {
            let mut guard = self.inner.lock().await;
            let result = guard.documents.remove(index);
            guard.ingestion.reset();
            (result, guard.ingestion.state().clone())
        };

        match &result {
            Ok(document) => {
                info!(document = %document.display_name, "documents: removed");
                self.emit(SessionEvent::DocumentsChanged);
            }
            Err(err) => debug!(error = %err, "documents: remove ignored"),
        }
        self.emit(SessionEvent::IngestionChanged(ingestion));
        result
    }

    pub async fn dismiss_notice(&self) {
        self.inner.lock().await.documents.dismiss_notice();
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.inner.lock().await.documents.list().to_vec()
    }

    pub async fn ingestion_state(&self) -> IngestionState {
        self.inner.lock().await.ingestion.state().clone()
    }

    /// Sends the current document set to the ingest endpoint. Returns
    /// `Skipped` without touching the backend when the set is empty or an
    /// upload is already in flight.
    pub async fn submit_documents(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SubmitOutcome, IngestError> {
        let ticket = {
            let mut guard = self.inner.lock().await;
            let documents = guard.documents.list().to_vec();
            match guard.ingestion.begin(&documents) {
                Ok(ticket) => ticket,
                Err(rejection) => {
                    debug!(reason = %rejection, "ingest: submit skipped");
                    return Ok(SubmitOutcome::Skipped(rejection));
                }
            }
        };

        info!(
            attempt = ticket.attempt(),
            documents = ticket.documents().len(),
            "ingest: submitting document set"
        );
        self.emit(SessionEvent::IngestionChanged(IngestionState::Uploading));

        let result = self
            .backend
            .ingest(ticket.documents(), cancel)
            .await
            .map(|response| response.stats());

        let mut guard = self.inner.lock().await;
        let completion = guard.ingestion.complete(ticket, result);
        let state = guard.ingestion.state().clone();
        match completion {
            Completion::Succeeded(stats) => {
                let turn = guard.conversation.append_system(stats.completion_notice());
                drop(guard);
                info!(
                    files = stats.files_processed.len(),
                    chunks = stats.total_chunks,
                    "ingest: completed"
                );
                self.emit(SessionEvent::IngestionChanged(state));
                self.emit(SessionEvent::TurnAppended(turn));
                Ok(SubmitOutcome::Ingested(stats))
            }
            Completion::Failed(err) => {
                drop(guard);
                warn!(error = %err, "ingest: failed");
                self.emit(SessionEvent::IngestionChanged(state));
                Err(err)
            }
            Completion::Superseded => {
                drop(guard);
                info!("ingest: document set changed during upload, verdict discarded");
                self.emit(SessionEvent::IngestionChanged(state));
                Ok(SubmitOutcome::Superseded)
            }
        }
    }

    /// Runs one question/answer exchange. The user turn is appended before
    /// the query is issued, and exactly one response turn follows it.
    pub async fn send_question(&self, content: &str, cancel: &CancellationToken) -> SendOutcome {
        let (ticket, citation_cleared) = {
            let mut guard = self.inner.lock().await;
            let ticket = match guard.conversation.begin_exchange(content) {
                Ok(ticket) => ticket,
                Err(rejection) => {
                    debug!(reason = %rejection, "query: question rejected");
                    return SendOutcome::Rejected(rejection);
                }
            };
            let citation_cleared = guard.citations.current().is_some();
            guard.citations.clear();
            (ticket, citation_cleared)
        };

        self.emit(SessionEvent::TurnAppended(ticket.user_turn()));
        self.emit(SessionEvent::GeneratingChanged(true));
        if citation_cleared {
            self.emit(SessionEvent::CitationChanged(None));
        }

        let request = QueryRequest::unscoped(ticket.question());
        let result = self.backend.query(&request, cancel).await;
        if let Err(err) = &result {
            warn!(error = %err, "query: exchange failed");
        }

        let outcome = {
            let mut guard = self.inner.lock().await;
            guard.conversation.finish_exchange(ticket, result)
        };

        self.emit(SessionEvent::TurnAppended(outcome.turn()));
        self.emit(SessionEvent::GeneratingChanged(false));
        outcome.into()
    }

    pub async fn select_citation(&self, citation: CitationRef) -> Result<Citation, SessionError> {
        let selected = {
            let mut guard = self.inner.lock().await;
            let selected = guard
                .conversation
                .citation(citation)
                .cloned()
                .ok_or(SessionError::UnknownCitation {
                    turn: citation.turn.0,
                    index: citation.index,
                })?;
            guard.citations.select(citation);
            selected
        };

        self.emit(SessionEvent::CitationChanged(Some(citation)));
        Ok(selected)
    }

    pub async fn clear_citation(&self) {
        self.inner.lock().await.citations.clear();
        self.emit(SessionEvent::CitationChanged(None));
    }

    pub async fn active_citation(&self) -> Option<Citation> {
        self.inner
            .lock()
            .await
            .active_citation()
            .map(|(_, citation)| citation)
    }

    pub async fn turns(&self) -> Vec<ConversationTurn> {
        self.inner.lock().await.conversation.turns().to_vec()
    }

    pub async fn turn(&self, turn: TurnId) -> Option<ConversationTurn> {
        self.inner.lock().await.conversation.get(turn).cloned()
    }

    pub async fn is_generating(&self) -> bool {
        self.inner.lock().await.conversation.is_generating()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let guard = self.inner.lock().await;
        SessionSnapshot {
            documents: guard.documents.list().to_vec(),
            admission_notice: guard.documents.pending_notice().map(ToString::to_string),
            ingestion: guard.ingestion.state().clone(),
            turns: guard.conversation.turns().to_vec(),
            is_generating: guard.conversation.is_generating(),
            active_citation: guard.active_citation(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
