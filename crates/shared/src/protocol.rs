use serde::{Deserialize, Serialize};

use crate::domain::Citation;

/// Multipart field name repeated once per uploaded document.
pub const INGEST_FILES_FIELD: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub files_processed: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    pub total_chunks: u64,
}

impl IngestResponse {
    pub fn stats(&self) -> IngestStats {
        IngestStats {
            files_processed: self.files_processed.clone(),
            total_chunks: self.total_chunks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub files_processed: Vec<String>,
    pub total_chunks: u64,
}

impl IngestStats {
    pub fn completion_notice(&self) -> String {
        format!(
            "Ingestion Complete: Processed {} files ({} chunks). Database is ready.",
            self.files_processed.len(),
            self.total_chunks
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub year_filter: Option<i32>,
}

impl QueryRequest {
    pub fn unscoped(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            year_filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Option<Vec<Citation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub confidence_score: Option<f64>,
}

impl From<QueryResponse> for QueryAnswer {
    fn from(value: QueryResponse) -> Self {
        Self {
            answer: value.answer,
            citations: value.citations.unwrap_or_default(),
            confidence_score: value.confidence_score,
        }
    }
}

/// Error body shape returned by the backend on rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    pub fn summary(&self) -> String {
        match &self.detail {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}
