//! Playback engine tests: reveal windows, session transitions and
//! completion percentage over realistic lesson shapes.

use chrono::Utc;
use lessonform_nodes::{
    LessonDocument, LessonNode, NodeRegistry, NodeType, RichTextState, TapToRevealPayload,
    TrueOrFalsePayload,
};
use lessonform_progress::{
    parse_or_default, PlaybackSession, ProgressEntry, ProgressMap, RevealMode, SessionState,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

fn question() -> LessonNode {
    LessonNode::true_or_false(TrueOrFalsePayload {
        question_state: RichTextState::paragraph_root("Is water wet?"),
        correct_answer: true,
        hint: None,
        explanation_state: RichTextState::paragraph_root("It is."),
    })
}

fn card() -> LessonNode {
    LessonNode::tap_to_reveal(TapToRevealPayload {
        front_side_state: RichTextState::paragraph_root("front"),
        back_side_state: RichTextState::paragraph_root("back"),
    })
}

fn entry(node_type: NodeType) -> ProgressEntry {
    ProgressEntry {
        node_type,
        payload: json!({}),
        timestamp: Utc::now(),
    }
}

/// `[TrueOrFalse(A), PageBreak(B), TapToReveal(C)]` and its uuids
fn gated_lesson() -> (PlaybackSession, Uuid, Uuid, Uuid) {
    let nodes = vec![question(), LessonNode::page_break(), card()];
    let uuid_a = nodes[0].uuid().unwrap();
    let uuid_b = nodes[1].uuid().unwrap();
    let uuid_c = nodes[2].uuid().unwrap();

    let document = LessonDocument::from_children(nodes);
    let session = PlaybackSession::new(document, RevealMode::Progressive);
    (session, uuid_a, uuid_b, uuid_c)
}

#[test]
fn test_empty_map_reveals_through_first_tracked_node() {
    let (session, _, _, _) = gated_lesson();
    let map = ProgressMap::new();

    let window = session.reveal_window(&map);
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].node_type(), NodeType::TrueOrFalse);
}

#[test]
fn test_window_extends_through_first_unplayed_node() {
    let (session, uuid_a, _, _) = gated_lesson();
    let mut map = ProgressMap::new();
    map.insert(uuid_a, entry(NodeType::TrueOrFalse));

    let window = session.reveal_window(&map);
    assert_eq!(window.len(), 2);
    assert_eq!(window[1].node_type(), NodeType::PageBreak);
}

#[test]
fn test_all_played_reveals_whole_document_and_awaits_completion() {
    let (mut session, uuid_a, uuid_b, uuid_c) = gated_lesson();
    let mut map = ProgressMap::new();
    map.insert(uuid_a, entry(NodeType::TrueOrFalse));
    map.insert(uuid_b, entry(NodeType::PageBreak));
    map.insert(uuid_c, entry(NodeType::TapToReveal));

    assert_eq!(session.reveal_window(&map).len(), 3);
    assert_eq!(session.sync(&map), SessionState::AwaitingCompletion);
}

#[test]
fn test_window_grows_monotonically_with_the_map() {
    let (session, uuid_a, uuid_b, uuid_c) = gated_lesson();
    let mut map = ProgressMap::new();
    let mut previous = session.reveal_window(&map).len();

    for (uuid, node_type) in [
        (uuid_a, NodeType::TrueOrFalse),
        (uuid_b, NodeType::PageBreak),
        (uuid_c, NodeType::TapToReveal),
    ] {
        map.insert(uuid, entry(node_type));
        let current = session.reveal_window(&map).len();
        assert!(current >= previous);
        previous = current;
    }
    assert_eq!(previous, 3);
}

#[test]
fn test_recompute_with_unchanged_map_is_a_noop() {
    let (mut session, uuid_a, _, _) = gated_lesson();
    let mut map = ProgressMap::new();
    map.insert(uuid_a, entry(NodeType::TrueOrFalse));

    let first = session.apply_reveal(&map).unwrap();
    assert!(first.is_some());

    let second = session.apply_reveal(&map).unwrap();
    assert_eq!(second, None);
}

#[test]
fn test_recompute_reapplies_after_map_growth() {
    let (mut session, uuid_a, uuid_b, _) = gated_lesson();
    let mut map = ProgressMap::new();

    assert!(session.apply_reveal(&map).unwrap().is_some());

    map.insert(uuid_a, entry(NodeType::TrueOrFalse));
    map.insert(uuid_b, entry(NodeType::PageBreak));
    let reapplied = session.apply_reveal(&map).unwrap();
    assert_eq!(reapplied.unwrap().len(), 3);
}

#[test]
fn test_session_transitions() {
    let (mut session, uuid_a, uuid_b, uuid_c) = gated_lesson();
    let mut map = ProgressMap::new();

    assert_eq!(session.sync(&map), SessionState::NotStarted);

    map.insert(uuid_a, entry(NodeType::TrueOrFalse));
    assert_eq!(session.sync(&map), SessionState::InProgress);

    // Completion action before everything is played is refused
    assert_eq!(session.complete(&map), SessionState::InProgress);

    map.insert(uuid_b, entry(NodeType::PageBreak));
    map.insert(uuid_c, entry(NodeType::TapToReveal));
    assert_eq!(session.sync(&map), SessionState::AwaitingCompletion);
    assert_eq!(session.complete(&map), SessionState::Completed);
}

#[test]
fn test_completed_is_terminal_and_pins_percentage() {
    let (mut session, uuid_a, uuid_b, uuid_c) = gated_lesson();
    let mut map = ProgressMap::new();
    map.insert(uuid_a, entry(NodeType::TrueOrFalse));
    map.insert(uuid_b, entry(NodeType::PageBreak));
    map.insert(uuid_c, entry(NodeType::TapToReveal));
    session.complete(&map);

    // Further map mutation must not move the state or the percentage
    map.insert(Uuid::new_v4(), entry(NodeType::TrueOrFalse));
    assert_eq!(session.sync(&map), SessionState::Completed);
    assert_eq!(session.completion_percentage(&map), 100);
}

#[test]
fn test_percentage_stays_in_bounds() {
    let (session, uuid_a, uuid_b, uuid_c) = gated_lesson();
    let mut map = ProgressMap::new();

    assert_eq!(session.completion_percentage(&map), 0);

    for (uuid, node_type) in [
        (uuid_a, NodeType::TrueOrFalse),
        (uuid_b, NodeType::PageBreak),
        (uuid_c, NodeType::TapToReveal),
    ] {
        map.insert(uuid, entry(node_type));
        let percentage = session.completion_percentage(&map);
        assert!(percentage <= 100);
    }
}

#[test]
fn test_last_played_follows_document_order_not_record_order() {
    let (session, uuid_a, _, uuid_c) = gated_lesson();

    // Play the last node first, then the first
    let mut backwards = ProgressMap::new();
    backwards.insert(uuid_c, entry(NodeType::TapToReveal));
    backwards.insert(uuid_a, entry(NodeType::TrueOrFalse));

    let mut forwards = ProgressMap::new();
    forwards.insert(uuid_a, entry(NodeType::TrueOrFalse));
    forwards.insert(uuid_c, entry(NodeType::TapToReveal));

    // Percentage depends on where the furthest played node sits in the
    // document, so record order must not change it
    assert_eq!(
        session.completion_percentage(&backwards),
        session.completion_percentage(&forwards)
    );
}

#[test]
fn test_untracked_prose_never_gates() {
    let document = LessonDocument::from_children(vec![
        LessonNode::rich_text(RichTextState::paragraph_root("intro")),
        LessonNode::rich_text(RichTextState::paragraph_root("context")),
        question(),
        LessonNode::rich_text(RichTextState::paragraph_root("outro")),
    ]);
    let session = PlaybackSession::new(document, RevealMode::Progressive);

    // Prose before the first gate is revealed with it
    let window = session.reveal_window(&ProgressMap::new());
    assert_eq!(window.len(), 3);
    assert_eq!(window[2].node_type(), NodeType::TrueOrFalse);
}

#[test]
fn test_document_without_gates_is_fully_revealed() {
    let document = LessonDocument::from_children(vec![
        LessonNode::rich_text(RichTextState::paragraph_root("just prose")),
    ]);
    let session = PlaybackSession::new(document, RevealMode::Progressive);

    assert_eq!(session.reveal_window(&ProgressMap::new()).len(), 1);
}

#[test]
fn test_corrupt_content_substitutes_empty_document() {
    let registry = NodeRegistry::with_defaults();

    let (document, integrity) = parse_or_default(&registry, "{ definitely not json");
    assert_eq!(document.children().len(), 0);
    assert!(integrity.is_clean());

    let (document, _) = parse_or_default(&registry, r#"{"noRoot": true}"#);
    assert_eq!(document.children().len(), 0);
}

#[test]
fn test_progress_map_round_trips_through_persisted_json() {
    let (session, uuid_a, uuid_b, _) = gated_lesson();
    let mut map = ProgressMap::new();
    map.insert(uuid_a, entry(NodeType::TrueOrFalse));
    map.insert(uuid_b, entry(NodeType::PageBreak));

    let json = serde_json::to_string(&map).unwrap();
    let restored: ProgressMap = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, map);
    assert_eq!(
        session.reveal_window(&restored).len(),
        session.reveal_window(&map).len()
    );
}
