use super::*;

fn citation(source: &str, snippet: &str) -> Citation {
    Citation {
        source: source.to_string(),
        page: 3,
        year: Some(2022),
        snippet: snippet.to_string(),
        chunk_id: None,
    }
}

fn answer(text: &str, citations: Vec<Citation>) -> QueryAnswer {
    QueryAnswer {
        answer: text.to_string(),
        citations,
        confidence_score: None,
    }
}

#[test]
fn blank_user_content_is_not_appended() {
    let mut log = ConversationLog::new();
    assert_eq!(log.append_user(""), None);
    assert_eq!(log.append_user("  \t\n"), None);
    assert!(log.is_empty());
}

#[test]
fn appends_keep_order_and_positions() {
    let mut log = ConversationLog::new();
    let first = log.append_system("ready");
    let second = log.append_user("hello").expect("user turn");
    let third = log.append_assistant("hi", Vec::new());

    assert_eq!((first, second, third), (TurnId(0), TurnId(1), TurnId(2)));
    let roles: Vec<_> = log.turns().iter().map(ConversationTurn::role).collect();
    assert_eq!(
        roles,
        vec![
            shared::domain::TurnRole::System,
            shared::domain::TurnRole::User,
            shared::domain::TurnRole::Assistant
        ]
    );
}

#[test]
fn exchange_appends_user_then_assistant() {
    let mut log = ConversationLog::new();
    let ticket = log
        .begin_exchange("What was the trend in Creatinine levels?")
        .expect("begin");
    assert!(log.is_generating());
    assert_eq!(log.len(), 1);
    assert_eq!(ticket.question(), "What was the trend in Creatinine levels?");

    let outcome = log.finish_exchange(
        ticket,
        Ok(answer(
            "Rising over 6 months.",
            vec![citation("rec1.pdf", "Cr 1.8 mg/dL")],
        )),
    );

    assert_eq!(outcome, ExchangeOutcome::Answered(TurnId(1)));
    assert!(!log.is_generating());
    let turn = log.get(TurnId(1)).expect("assistant turn");
    assert_eq!(turn.content(), "Rising over 6 months.");
    assert_eq!(turn.citations().len(), 1);
}

#[test]
fn failed_exchange_appends_system_notice() {
    let mut log = ConversationLog::new();
    let ticket = log.begin_exchange("anything?").expect("begin");
    let outcome = log.finish_exchange(ticket, Err(QueryError::Transport("refused".into())));

    assert_eq!(outcome, ExchangeOutcome::Failed(TurnId(1)));
    assert_eq!(
        log.get(TurnId(1)),
        Some(&ConversationTurn::System {
            content: "Error connecting to the AI. Is the backend running?".to_string()
        })
    );
    assert!(!log.is_generating());
}

#[test]
fn exchange_rejections_have_no_side_effects() {
    let mut log = ConversationLog::new();
    assert_eq!(log.begin_exchange("   ").expect_err("blank"), SendRejection::Blank);
    assert!(!log.is_generating());

    let _ticket = log.begin_exchange("first").expect("begin");
    assert_eq!(
        log.begin_exchange("second").expect_err("busy"),
        SendRejection::AlreadyGenerating
    );
    assert_eq!(log.len(), 1);
}

#[test]
fn citations_resolve_by_position_only() {
    let mut log = ConversationLog::new();
    log.append_user("q").expect("user turn");
    let duplicate = citation("rec1.pdf", "same text");
    let turn = log.append_assistant("a", vec![duplicate.clone(), duplicate]);

    let refs = log.citation_refs(turn);
    assert_eq!(refs.len(), 2);
    assert_ne!(refs[0], refs[1]);
    assert_eq!(log.citation(refs[0]), log.citation(refs[1]));

    assert!(log.citation(CitationRef { turn, index: 2 }).is_none());
    assert!(log
        .citation(CitationRef {
            turn: TurnId(0),
            index: 0
        })
        .is_none());
    assert!(log.citation_refs(TurnId(0)).is_empty());
}
