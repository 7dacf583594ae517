//! Client-side state machine for a grounded question-answer console: the
//! candidate document set, the ingestion lifecycle, the conversation log, and
//! citation selection, composed by [`EvidenceSession`].

use async_trait::async_trait;
use shared::{
    domain::Document,
    error::{IngestError, QueryError},
    protocol::{IngestResponse, QueryAnswer, QueryRequest},
};
use tokio_util::sync::CancellationToken;

pub mod citation;
pub mod conversation;
pub mod document_set;
pub mod ingestion;
pub mod session;
pub mod transport;

pub use citation::{CitationSelector, EvidenceView};
pub use conversation::{ConversationLog, ExchangeOutcome, SendRejection};
pub use document_set::DocumentSet;
pub use ingestion::{IngestionController, IngestionState, SubmitRejection};
pub use session::{
    EvidenceSession, SendOutcome, SessionError, SessionEvent, SessionSnapshot, SubmitOutcome,
};
pub use transport::HttpRagBackend;

/// The two request/response contracts of the retrieval backend.
///
/// Implementations must resolve (successfully or not) for every call; the
/// session relies on that to lower its busy flags. The cancellation token is
/// never triggered by the session itself.
#[async_trait]
pub trait RagBackend: Send + Sync {
    async fn ingest(
        &self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> Result<IngestResponse, IngestError>;

    async fn query(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryAnswer, QueryError>;
}

pub struct MissingRagBackend;

#[async_trait]
impl RagBackend for MissingRagBackend {
    async fn ingest(
        &self,
        _documents: &[Document],
        _cancel: &CancellationToken,
    ) -> Result<IngestResponse, IngestError> {
        Err(IngestError::Unavailable)
    }

    async fn query(
        &self,
        _request: &QueryRequest,
        _cancel: &CancellationToken,
    ) -> Result<QueryAnswer, QueryError> {
        Err(QueryError::Unavailable)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
