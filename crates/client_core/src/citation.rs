use std::fmt;

use shared::domain::{Citation, CitationRef};

/// The single citation currently under inspection, if any.
#[derive(Debug, Default)]
pub struct CitationSelector {
    active: Option<CitationRef>,
}

impl CitationSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, citation: CitationRef) {
        self.active = Some(citation);
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn current(&self) -> Option<CitationRef> {
        self.active
    }
}

/// Display projection of a citation for the verification panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceView {
    pub source: String,
    pub page: i64,
    pub year: String,
    pub snippet: String,
    pub chunk_id: String,
}

impl From<&Citation> for EvidenceView {
    fn from(citation: &Citation) -> Self {
        Self {
            source: citation.source.clone(),
            page: citation.page,
            year: citation
                .year
                .map_or_else(|| "Unknown".to_string(), |year| year.to_string()),
            snippet: citation.snippet.clone(),
            chunk_id: citation
                .chunk_id
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

impl fmt::Display for EvidenceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source: {} (page {}, {})", self.source, self.page, self.year)?;
        writeln!(f, "  \"{}\"", self.snippet)?;
        write!(f, "  chunk: {}", self.chunk_id)
    }
}

#[cfg(test)]
#[path = "tests/citation_tests.rs"]
mod tests;
