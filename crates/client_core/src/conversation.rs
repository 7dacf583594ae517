//! Append-only conversation record and the in-flight exchange guard.

use shared::{
    domain::{Citation, CitationRef, ConversationTurn, TurnId},
    error::QueryError,
    protocol::QueryAnswer,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejection {
    #[error("question is blank")]
    Blank,
    #[error("an answer is still being generated")]
    AlreadyGenerating,
}

#[derive(Debug)]
pub struct ExchangeTicket {
    user_turn: TurnId,
    question: String,
}

impl ExchangeTicket {
    pub fn user_turn(&self) -> TurnId {
        self.user_turn
    }

    pub fn question(&self) -> &str {
        &self.question
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Answered(TurnId),
    Failed(TurnId),
}

impl ExchangeOutcome {
    pub fn turn(self) -> TurnId {
        match self {
            Self::Answered(turn) | Self::Failed(turn) => turn,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
    generating: bool,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` without appending when `content` is blank.
    pub fn append_user(&mut self, content: impl Into<String>) -> Option<TurnId> {
        let content = content.into();
        if content.trim().is_empty() {
            return None;
        }
        Some(self.push(ConversationTurn::User { content }))
    }

    pub fn append_assistant(
        &mut self,
        content: impl Into<String>,
        citations: Vec<Citation>,
    ) -> TurnId {
        self.push(ConversationTurn::Assistant {
            content: content.into(),
            citations,
        })
    }

    pub fn append_system(&mut self, content: impl Into<String>) -> TurnId {
        self.push(ConversationTurn::System {
            content: content.into(),
        })
    }

    fn push(&mut self, turn: ConversationTurn) -> TurnId {
        let id = TurnId(self.turns.len());
        self.turns.push(turn);
        id
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn get(&self, turn: TurnId) -> Option<&ConversationTurn> {
        self.turns.get(turn.0)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Resolves a positional citation handle. Only assistant turns carry
    /// citations, so refs into user or system turns never resolve.
    pub fn citation(&self, citation: CitationRef) -> Option<&Citation> {
        self.get(citation.turn)?.citations().get(citation.index)
    }

    pub fn citation_refs(&self, turn: TurnId) -> Vec<CitationRef> {
        let count = self.get(turn).map_or(0, |entry| entry.citations().len());
        (0..count)
            .map(|index| CitationRef { turn, index })
            .collect()
    }

    /// Opens an exchange: appends the user turn and raises the generating
    /// flag. Nothing changes when the question is rejected.
    pub fn begin_exchange(&mut self, content: &str) -> Result<ExchangeTicket, SendRejection> {
        if self.generating {
            return Err(SendRejection::AlreadyGenerating);
        }
        let user_turn = self.append_user(content).ok_or(SendRejection::Blank)?;
        self.generating = true;
        Ok(ExchangeTicket {
            user_turn,
            question: content.to_string(),
        })
    }

    /// Closes an exchange with exactly one response turn and lowers the flag.
    pub fn finish_exchange(
        &mut self,
        ticket: ExchangeTicket,
        result: Result<QueryAnswer, QueryError>,
    ) -> ExchangeOutcome {
        debug_assert!(ticket.user_turn.0 < self.turns.len());
        self.generating = false;
        match result {
            Ok(answer) => {
                ExchangeOutcome::Answered(self.append_assistant(answer.answer, answer.citations))
            }
            Err(err) => ExchangeOutcome::Failed(self.append_system(err.user_message())),
        }
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
