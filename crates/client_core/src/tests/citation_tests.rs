use super::*;
use shared::domain::TurnId;

fn at(turn: usize, index: usize) -> CitationRef {
    CitationRef {
        turn: TurnId(turn),
        index,
    }
}

#[test]
fn select_replaces_without_clearing_first() {
    let mut selector = CitationSelector::new();
    assert_eq!(selector.current(), None);

    selector.select(at(1, 0));
    selector.select(at(3, 2));
    assert_eq!(selector.current(), Some(at(3, 2)));

    selector.clear();
    assert_eq!(selector.current(), None);
}

#[test]
fn evidence_view_fills_missing_fields() {
    let view = EvidenceView::from(&Citation {
        source: "rec1.pdf".to_string(),
        page: 3,
        year: None,
        snippet: "Cr 1.8 mg/dL".to_string(),
        chunk_id: None,
    });

    assert_eq!(view.year, "Unknown");
    assert_eq!(view.chunk_id, "N/A");
    let rendered = view.to_string();
    assert!(rendered.contains("rec1.pdf (page 3, Unknown)"));
    assert!(rendered.contains("\"Cr 1.8 mg/dL\""));
}
