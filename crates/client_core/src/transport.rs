//! HTTP implementation of [`RagBackend`] against the ingest/query endpoints.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::Document,
    error::{IngestError, QueryError},
    protocol::{
        ErrorDetail, IngestResponse, QueryAnswer, QueryRequest, QueryResponse, INGEST_FILES_FIELD,
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::RagBackend;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/v1";

pub struct HttpRagBackend {
    http: Client,
    base_url: String,
}

impl HttpRagBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn ingest_form(documents: &[Document]) -> Result<Form, IngestError> {
        let mut form = Form::new();
        for document in documents {
            let part = Part::bytes(document.raw_handle.bytes.to_vec())
                .file_name(document.display_name.clone())
                .mime_str(document.raw_handle.mime_type_or_default())
                .map_err(|err| {
                    IngestError::Transport(format!(
                        "invalid mime type for {}: {err}",
                        document.display_name
                    ))
                })?;
            form = form.part(INGEST_FILES_FIELD, part);
        }
        Ok(form)
    }

    async fn post_ingest(&self, documents: &[Document]) -> Result<IngestResponse, IngestError> {
        let form = Self::ingest_form(documents)?;
        let response = self
            .http
            .post(self.endpoint("ingest"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| IngestError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = rejection_detail(response).await;
            return Err(IngestError::Status { status, detail });
        }

        response
            .json::<IngestResponse>()
            .await
            .map_err(|err| IngestError::Decode(err.to_string()))
    }

    async fn post_query(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError> {
        let response = self
            .http
            .post(self.endpoint("query"))
            .json(request)
            .send()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = rejection_detail(response).await;
            return Err(QueryError::Status { status, detail });
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|err| QueryError::Decode(err.to_string()))?;
        Ok(body.into())
    }
}

async fn rejection_detail(response: Response) -> Option<String> {
    response
        .json::<ErrorDetail>()
        .await
        .ok()
        .map(|body| body.summary())
}

#[async_trait]
impl RagBackend for HttpRagBackend {
    async fn ingest(
        &self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> Result<IngestResponse, IngestError> {
        debug!(
            documents = documents.len(),
            url = %self.endpoint("ingest"),
            "transport: posting ingest request"
        );
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(IngestError::Cancelled),
            result = self.post_ingest(documents) => result,
        };
        match &result {
            Ok(body) => info!(
                files = body.files_processed.len(),
                chunks = body.total_chunks,
                pages = ?body.total_pages,
                "transport: ingest accepted"
            ),
            Err(err) => warn!(error = %err, "transport: ingest failed"),
        }
        result
    }

    async fn query(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryAnswer, QueryError> {
        debug!(url = %self.endpoint("query"), "transport: posting query request");
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(QueryError::Cancelled),
            result = self.post_query(request) => result,
        };
        match &result {
            Ok(answer) => info!(citations = answer.citations.len(), "transport: query answered"),
            Err(err) => warn!(error = %err, "transport: query failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
