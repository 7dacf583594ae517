//! Operator commands read from the console, parsed before they reach the session.

use std::path::PathBuf;

use thiserror::Error;

pub const HELP: &str = "\
commands:
  add <path>          add a document to the candidate set (max 3)
  remove <n>          remove document n from the set
  list                show the candidate set
  ingest              ingest all candidate documents
  ask <question>      ask a question about the ingested documents
  cite <turn> <n>     inspect citation n of an assistant turn
  close               close the evidence panel
  status              show ingestion and session status
  log                 print the conversation
  help                show this help
  quit                exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Add { path: PathBuf },
    Remove { index: usize },
    List,
    Ingest,
    Ask { question: String },
    Cite { turn: usize, index: usize },
    Close,
    Status,
    Log,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("expected a number starting at 1, got '{0}'")]
    InvalidNumber(String),
}

/// Parses one console line. Blank lines yield `Ok(None)`. Positions typed by
/// the operator are 1-based and converted to 0-based indices here.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                return Err(CommandParseError::MissingArgument("path"));
            }
            ConsoleCommand::Add {
                path: PathBuf::from(rest),
            }
        }
        "remove" | "rm" => ConsoleCommand::Remove {
            index: parse_position(rest, "document number")?,
        },
        "list" | "ls" => ConsoleCommand::List,
        "ingest" => ConsoleCommand::Ingest,
        "ask" => ConsoleCommand::Ask {
            question: rest.to_string(),
        },
        "cite" => {
            let mut args = rest.split_whitespace();
            let turn = parse_position(args.next().unwrap_or_default(), "turn number")?;
            let index = parse_position(args.next().unwrap_or_default(), "citation number")?;
            ConsoleCommand::Cite { turn, index }
        }
        "close" => ConsoleCommand::Close,
        "status" => ConsoleCommand::Status,
        "log" => ConsoleCommand::Log,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(CommandParseError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn parse_position(raw: &str, name: &'static str) -> Result<usize, CommandParseError> {
    if raw.is_empty() {
        return Err(CommandParseError::MissingArgument(name));
    }
    match raw.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(CommandParseError::InvalidNumber(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
