//! Admission-controlled set of candidate documents awaiting ingestion.

use shared::{
    domain::{Document, DocumentId, DocumentUpload, MAX_DOCUMENTS},
    error::AdmissionError,
};

#[derive(Debug, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
    next_id: u64,
    notice: Option<AdmissionError>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `upload` unless the set is full or already holds a document
    /// with the same display name. Any rejection is kept as the pending
    /// notice until the next mutation or an explicit dismissal.
    pub fn add(&mut self, upload: DocumentUpload) -> Result<DocumentId, AdmissionError> {
        self.notice = None;
        let result = self.admit(upload);
        if let Err(err) = &result {
            self.notice = Some(err.clone());
        }
        result
    }

    fn admit(&mut self, upload: DocumentUpload) -> Result<DocumentId, AdmissionError> {
        if self.documents.len() >= MAX_DOCUMENTS {
            return Err(AdmissionError::MaxCountExceeded {
                limit: MAX_DOCUMENTS,
            });
        }

        if self.contains_name(&upload.display_name) {
            return Err(AdmissionError::DuplicateName {
                display_name: upload.display_name,
            });
        }

        self.next_id += 1;
        let id = DocumentId(self.next_id);
        self.documents.push(Document {
            id,
            display_name: upload.display_name,
            raw_handle: upload.payload,
        });
        Ok(id)
    }

    pub fn remove(&mut self, index: usize) -> Result<Document, AdmissionError> {
        self.notice = None;
        if index >= self.documents.len() {
            return Err(AdmissionError::IndexOutOfRange {
                index,
                len: self.documents.len(),
            });
        }
        Ok(self.documents.remove(index))
    }

    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.documents.len() >= MAX_DOCUMENTS
    }

    pub fn contains_name(&self, display_name: &str) -> bool {
        self.documents
            .iter()
            .any(|document| document.display_name == display_name)
    }

    pub fn pending_notice(&self) -> Option<&AdmissionError> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
#[path = "tests/document_set_tests.rs"]
mod tests;
