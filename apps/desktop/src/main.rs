use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    EvidenceSession, EvidenceView, HttpRagBackend, SendOutcome, SessionEvent, SubmitOutcome,
};
use shared::domain::{CitationRef, TurnId};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod upload;

use commands::{parse_command, ConsoleCommand, HELP};

#[derive(Parser, Debug)]
#[command(about = "Console for grounded question answering over a small document set")]
struct Args {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(&args.config)?;
    if let Some(backend_url) = args.backend_url {
        settings.backend_url = config::normalize_backend_url(&backend_url)?;
    }
    if let Some(log_filter) = args.log_filter {
        settings.log_filter = log_filter;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(backend = %settings.backend_url, "desktop: starting console");
    let session = EvidenceSession::new(Arc::new(HttpRagBackend::new(
        settings.backend_url.clone(),
    )));
    spawn_turn_printer(&session);

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read console input")?
    {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(err) = run_command(&session, command).await {
                    println!("error: {err:#}");
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    info!("desktop: console closed");
    Ok(())
}

/// Prints turns as they land, so answers that arrive while the operator is
/// typing still show up.
fn spawn_turn_printer(session: &Arc<EvidenceSession>) {
    let mut events = session.subscribe_events();
    let session = Arc::clone(session);
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::TurnAppended(turn_id)) => {
                    if let Some(turn) = session.turn(turn_id).await {
                        println!("{}", render::render_turn(turn_id, &turn));
                    }
                }
                Ok(SessionEvent::GeneratingChanged(true)) => println!("... generating answer"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "desktop: turn printer lagged behind session events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

async fn run_command(session: &Arc<EvidenceSession>, command: ConsoleCommand) -> Result<()> {
    match command {
        ConsoleCommand::Add { path } => {
            let upload = upload::load_upload(&path).await?;
            if let Err(err) = session.add_document(upload).await {
                println!("{err}");
                return Ok(());
            }
            print_documents(session).await;
        }
        ConsoleCommand::Remove { index } => match session.remove_document(index).await {
            Ok(_) => print_documents(session).await,
            Err(err) => println!("{err}"),
        },
        ConsoleCommand::List => print_documents(session).await,
        ConsoleCommand::Ingest => {
            let session = Arc::clone(session);
            tokio::spawn(async move {
                match session.submit_documents(&CancellationToken::new()).await {
                    Ok(SubmitOutcome::Ingested(_)) => {}
                    Ok(SubmitOutcome::Skipped(reason)) => println!("ingest skipped: {reason}"),
                    Ok(SubmitOutcome::Superseded) => {
                        println!("document set changed during upload; run 'ingest' again");
                    }
                    Err(err) => println!("{}", err.user_message()),
                }
            });
        }
        ConsoleCommand::Ask { question } => {
            let session = Arc::clone(session);
            tokio::spawn(async move {
                if let SendOutcome::Rejected(reason) = session
                    .send_question(&question, &CancellationToken::new())
                    .await
                {
                    println!("question not sent: {reason}");
                }
            });
        }
        ConsoleCommand::Cite { turn, index } => {
            let citation = CitationRef {
                turn: TurnId(turn),
                index,
            };
            match session.select_citation(citation).await {
                Ok(selected) => println!("{}", EvidenceView::from(&selected)),
                Err(err) => println!("{err}"),
            }
        }
        ConsoleCommand::Close => session.clear_citation().await,
        ConsoleCommand::Status => {
            println!("{}", render::render_status(&session.snapshot().await));
        }
        ConsoleCommand::Log => {
            let turns = session.turns().await;
            if turns.is_empty() {
                println!("no conversation yet");
            }
            for (idx, turn) in turns.iter().enumerate() {
                println!("{}", render::render_turn(TurnId(idx), turn));
            }
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}

async fn print_documents(session: &EvidenceSession) {
    let snapshot = session.snapshot().await;
    println!(
        "{}",
        render::render_documents(&snapshot.documents, snapshot.admission_notice.as_deref())
    );
}
