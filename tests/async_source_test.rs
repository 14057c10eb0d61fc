use std::sync::Arc;
use textcomplete::{Autocomplete, CompleteEvent, SourceDispatcher, TextBuffer, Trigger, WordListSource};

fn engine(
    words: &[&str],
) -> (
    Autocomplete<TextBuffer>,
    tokio::sync::mpsc::UnboundedReceiver<textcomplete::QueryResponse>,
) {
    let source = WordListSource::new(words.iter().copied()).with_prefix("@");
    let (dispatcher, rx) = SourceDispatcher::new(Arc::new(source));
    let engine = Autocomplete::new(TextBuffer::new(""), Trigger::new(r"@(\w*)$").unwrap())
        .with_query(dispatcher);
    (engine, rx)
}

#[tokio::test]
async fn test_dispatched_answer_populates_menu() {
    let (mut engine, mut rx) = engine(&["alice", "bob"]);
    let mut events = engine.subscribe();

    engine.surface_mut().insert_str("hi @b");
    assert!(engine.match_input());

    let response = rx.recv().await.unwrap();
    assert!(engine.resolve(response));
    assert!(engine.is_shown());
    assert_eq!(engine.highlighted().map(|o| o.label.as_str()), Some("bob"));
    assert!(matches!(events.recv().await, Some(CompleteEvent::Highlight(_))));
    assert_eq!(events.recv().await, Some(CompleteEvent::Show));

    let bob = engine.highlighted().map(|o| o.id.clone()).unwrap();
    engine.select(bob);
    assert_eq!(engine.surface().value(), "hi @bob ");
}

#[tokio::test]
async fn test_late_answers_for_old_queries_are_dropped() {
    let (mut engine, mut rx) = engine(&["alice", "alfred", "albert"]);

    engine.surface_mut().insert_str("@a");
    engine.match_input();
    engine.surface_mut().insert_str("lb");
    engine.match_input();

    let mut applied = Vec::new();
    for _ in 0..2 {
        let response = rx.recv().await.unwrap();
        let generation = response.generation;
        if engine.resolve(response) {
            applied.push(generation);
        }
    }

    assert_eq!(applied, vec![2]);
    let labels: Vec<&str> = engine.options().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["albert"]);
}

#[tokio::test]
async fn test_answer_after_cursor_left_match_is_ignored() {
    let (mut engine, mut rx) = engine(&["alice"]);
    engine.surface_mut().insert_str("@al");
    engine.match_input();
    engine.surface_mut().insert_str(" ");
    engine.match_input();

    let response = rx.recv().await.unwrap();
    assert!(!engine.resolve(response));
    assert!(!engine.is_shown());
}
