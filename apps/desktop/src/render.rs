//! Plain-text rendering of session state for the console.

use std::fmt::Write as _;

use client_core::{IngestionState, SessionSnapshot};
use shared::domain::{ConversationTurn, Document, TurnId, MAX_DOCUMENTS};

pub fn render_documents(documents: &[Document], notice: Option<&str>) -> String {
    let mut out = format!("Patient Records ({} added)", documents.len());
    for (idx, document) in documents.iter().enumerate() {
        let _ = write!(
            out,
            "\n  {}. {} ({} bytes)",
            idx + 1,
            document.display_name,
            document.raw_handle.len()
        );
    }
    if documents.len() >= MAX_DOCUMENTS {
        out.push_str("\n  Max Files Reached");
    }
    if let Some(notice) = notice {
        let _ = write!(out, "\n  ! {notice}");
    }
    out
}

pub fn render_turn(turn_id: TurnId, turn: &ConversationTurn) -> String {
    let number = turn_id.0 + 1;
    match turn {
        ConversationTurn::User { content } => format!("[{number}] you: {content}"),
        ConversationTurn::System { content } => format!("[{number}] system: {content}"),
        ConversationTurn::Assistant { content, citations } => {
            let mut out = format!("[{number}] assistant: {content}");
            if !citations.is_empty() {
                out.push_str("\n    sources:");
                for (idx, citation) in citations.iter().enumerate() {
                    let year = citation
                        .year
                        .map_or_else(|| "n.d.".to_string(), |year| year.to_string());
                    let _ = write!(
                        out,
                        " [{}] {} p.{} ({year})",
                        idx + 1,
                        citation.source,
                        citation.page
                    );
                }
            }
            out
        }
    }
}

pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let mut out = format!(
        "System Status: {} | documents {}/{} | {}",
        snapshot.ingestion.status_label(),
        snapshot.documents.len(),
        MAX_DOCUMENTS,
        snapshot.ingestion.action_label()
    );
    if let IngestionState::Failed(message) = &snapshot.ingestion {
        let _ = write!(out, " | {message}");
    }
    if snapshot.is_generating {
        out.push_str(" | generating answer...");
    }
    if let Some((citation, _)) = &snapshot.active_citation {
        let _ = write!(
            out,
            " | inspecting citation {} of turn {}",
            citation.index + 1,
            citation.turn.0 + 1
        );
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
