use std::sync::Arc;

use axum::{extract::Multipart, routing::post, Json, Router};
use client_core::{
    EvidenceSession, EvidenceView, HttpRagBackend, IngestionState, SendOutcome, SubmitOutcome,
};
use serde_json::{json, Value};
use shared::domain::{CitationRef, ConversationTurn, DocumentPayload, DocumentUpload, TurnId};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

async fn ingest(mut multipart: Multipart) -> Json<Value> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("field") {
        files.extend(field.file_name().map(str::to_string));
        field.bytes().await.expect("bytes");
    }
    Json(json!({
        "status": "Success",
        "message": "Ingestion complete. 42 chunks indexed.",
        "files_processed": files,
        "total_pages": 6,
        "total_chunks": 42
    }))
}

async fn query(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["year_filter"], Value::Null);
    Json(json!({
        "answer": "Rising over 6 months.",
        "citations": [{
            "source": "rec1.pdf",
            "page": 3,
            "year": 2022,
            "snippet": "Cr 1.8 mg/dL",
            "chunk_id": "c1"
        }],
        "confidence_score": 1.0
    }))
}

async fn spawn_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/api/v1/ingest", post(ingest))
        .route("/api/v1/query", post(query));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api/v1")
}

fn pdf(name: &str) -> DocumentUpload {
    DocumentUpload::new(
        name,
        DocumentPayload::new(b"%PDF-1.7 test".to_vec(), Some("application/pdf".to_string())),
    )
}

#[tokio::test]
async fn ingest_then_grounded_exchange_acceptance() {
    let base_url = spawn_backend().await;
    let session = EvidenceSession::new(Arc::new(HttpRagBackend::new(base_url)));
    let cancel = CancellationToken::new();

    session.add_document(pdf("a.pdf")).await.expect("admit a");
    session.add_document(pdf("b.pdf")).await.expect("admit b");

    let outcome = session.submit_documents(&cancel).await.expect("ingest");
    let stats = match outcome {
        SubmitOutcome::Ingested(stats) => stats,
        other => panic!("unexpected ingest outcome: {other:?}"),
    };
    assert_eq!(stats.files_processed, vec!["a.pdf", "b.pdf"]);
    assert_eq!(stats.total_chunks, 42);
    assert_eq!(session.ingestion_state().await.status_label(), "Ready");

    let outcome = session
        .send_question("What was the trend in Creatinine levels?", &cancel)
        .await;
    assert_eq!(outcome, SendOutcome::Answered(TurnId(2)));

    let turns = session.turns().await;
    assert_eq!(
        turns[0].content(),
        "Ingestion Complete: Processed 2 files (42 chunks). Database is ready."
    );
    assert!(matches!(turns[1], ConversationTurn::User { .. }));
    assert_eq!(turns[2].content(), "Rising over 6 months.");
    assert_eq!(turns[2].citations().len(), 1);

    let citation = session
        .select_citation(CitationRef {
            turn: TurnId(2),
            index: 0,
        })
        .await
        .expect("select citation");
    let view = EvidenceView::from(&citation);
    assert_eq!(view.chunk_id, "c1");
    assert_eq!(view.year, "2022");

    session.remove_document(1).await.expect("remove b");
    assert_eq!(session.ingestion_state().await, IngestionState::Idle);
    assert_eq!(
        session.active_citation().await.map(|c| c.snippet),
        Some("Cr 1.8 mg/dL".to_string())
    );
}
