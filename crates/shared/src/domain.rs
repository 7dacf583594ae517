use std::sync::Arc;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub $inner);
    };
}

id_newtype!(DocumentId, u64);
id_newtype!(TurnId, usize);

/// Upper bound on the candidate set handed to a single ingestion.
pub const MAX_DOCUMENTS: usize = 3;

pub const DEFAULT_DOCUMENT_MIME: &str = "application/pdf";

/// Raw bytes of a candidate document, shared so that snapshots taken for an
/// upload do not copy the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    pub bytes: Arc<[u8]>,
    pub mime_type: Option<String>,
}

impl DocumentPayload {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type_or_default(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_DOCUMENT_MIME)
    }
}

/// A document the operator has picked but not necessarily ingested yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub display_name: String,
    pub raw_handle: DocumentPayload,
}

/// An unadmitted document as the operator hands it over.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub display_name: String,
    pub payload: DocumentPayload,
}

impl DocumentUpload {
    pub fn new(display_name: impl Into<String>, payload: DocumentPayload) -> Self {
        Self {
            display_name: display_name.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub page: i64,
    #[serde(default)]
    pub year: Option<i32>,
    pub snippet: String,
    #[serde(default)]
    pub chunk_id: Option<String>,
}

/// Positional handle on a citation: the assistant turn that carries it and
/// its index in that turn's citation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitationRef {
    pub turn: TurnId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ConversationTurn {
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default)]
        citations: Vec<Citation>,
    },
    System {
        content: String,
    },
}

impl ConversationTurn {
    pub fn role(&self) -> TurnRole {
        match self {
            Self::User { .. } => TurnRole::User,
            Self::Assistant { .. } => TurnRole::Assistant,
            Self::System { .. } => TurnRole::System,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::User { content } | Self::Assistant { content, .. } | Self::System { content } => {
                content
            }
        }
    }

    pub fn citations(&self) -> &[Citation] {
        match self {
            Self::Assistant { citations, .. } => citations,
            Self::User { .. } | Self::System { .. } => &[],
        }
    }
}
