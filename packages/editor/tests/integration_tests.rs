//! Integration tests for the editor: command dispatch end to end,
//! placement, atomicity and identity preservation across save/load.

use anyhow::Result;
use lessonform_editor::{
    Anchor, Command, CommandError, DispatchOutcome, Document, Editor, EditorError, NodeType,
    Selection,
};
use lessonform_nodes::{
    FileKind, FileMetadata, FilePayload, MatchConceptsPayload, MatchPair, RichTextState,
    TrueOrFalsePayload,
};
use pretty_assertions::assert_eq;

fn question(text: &str) -> TrueOrFalsePayload {
    TrueOrFalsePayload {
        question_state: RichTextState::paragraph_root(text),
        correct_answer: true,
        hint: None,
        explanation_state: RichTextState::paragraph_root("because"),
    }
}

fn editor() -> Editor {
    Editor::with_default_plugins(Document::new()).unwrap()
}

#[test]
fn test_insert_at_document_end_without_selection() -> Result<()> {
    let mut editor = editor();

    let outcome = editor.dispatch(&Command::InsertTrueOrFalse {
        payload: question("Water boils at 100C at sea level."),
    })?;

    let DispatchOutcome::Handled(result) = outcome else {
        panic!("expected handled");
    };

    let children = editor.document().tree().children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].node_type(), NodeType::TrueOrFalse);
    // Trailing empty paragraph, caret inside it
    assert_eq!(children[1].node_type(), NodeType::RichText);
    assert_eq!(result.selection, Selection::caret_in_text(1));
    assert_eq!(editor.selection(), Selection::caret_in_text(1));
    Ok(())
}

#[test]
fn test_insert_after_anchored_block() -> Result<()> {
    let mut editor = editor();

    // Build three prose blocks, then anchor in the middle one
    editor.dispatch(&Command::InsertPageBreak)?;
    editor.dispatch(&Command::InsertPageBreak)?;
    editor.set_selection(Selection::Range {
        anchor: Anchor::Text { block_index: 1 },
    });

    editor.dispatch(&Command::InsertTrueOrFalse {
        payload: question("q"),
    })?;

    let children = editor.document().tree().children();
    assert_eq!(children[2].node_type(), NodeType::TrueOrFalse);
    assert_eq!(children[3].node_type(), NodeType::RichText);
    Ok(())
}

#[test]
fn test_insertion_index_clamps_to_length() -> Result<()> {
    let mut editor = editor();
    editor.set_selection(Selection::at_block(99));

    editor.dispatch(&Command::InsertPageBreak)?;

    let children = editor.document().tree().children();
    assert_eq!(children[0].node_type(), NodeType::PageBreak);
    Ok(())
}

#[test]
fn test_failed_command_is_a_full_rollback() -> Result<()> {
    let mut editor = editor();
    editor.dispatch(&Command::InsertPageBreak)?;
    let before = editor.document().tree().clone();
    let version = editor.document().version();

    let err = editor
        .dispatch(&Command::InsertMatchConcepts {
            payload: MatchConceptsPayload {
                title: RichTextState::paragraph_root("t"),
                items: vec![],
            },
        })
        .unwrap_err();

    assert!(matches!(
        err,
        EditorError::Command(CommandError::EmptyMatchItems)
    ));
    // No node, no trailing paragraph, no version bump
    assert_eq!(editor.document().tree(), &before);
    assert_eq!(editor.document().version(), version);
    Ok(())
}

#[test]
fn test_edit_preserves_identity() -> Result<()> {
    let mut editor = editor();
    let DispatchOutcome::Handled(inserted) = editor.dispatch(&Command::InsertTrueOrFalse {
        payload: question("original"),
    })?
    else {
        panic!("expected handled");
    };

    let uuid_before = editor
        .document()
        .tree()
        .find_by_key(&inserted.node_key)
        .and_then(|n| n.uuid())
        .unwrap();

    editor.dispatch(&Command::EditTrueOrFalse {
        node_key: inserted.node_key.clone(),
        payload: question("corrected"),
    })?;

    let node = editor
        .document()
        .tree()
        .find_by_key(&inserted.node_key)
        .unwrap();
    assert_eq!(node.uuid().unwrap(), uuid_before);
    assert!(node.text_content().contains("corrected"));
    // Position unchanged, no extra paragraph appended by edits
    assert_eq!(editor.document().tree().children().len(), 2);
    Ok(())
}

#[test]
fn test_edit_type_mismatch_is_rejected() -> Result<()> {
    let mut editor = editor();
    let DispatchOutcome::Handled(inserted) = editor.dispatch(&Command::InsertTrueOrFalse {
        payload: question("q"),
    })?
    else {
        panic!("expected handled");
    };

    let err = editor
        .dispatch(&Command::EditMatchConcepts {
            node_key: inserted.node_key,
            payload: MatchConceptsPayload {
                title: RichTextState::paragraph_root("t"),
                items: vec![MatchPair {
                    item: RichTextState::paragraph_root("a"),
                    value: RichTextState::paragraph_root("1"),
                }],
            },
        })
        .unwrap_err();

    assert!(matches!(
        err,
        EditorError::Command(CommandError::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_identity_survives_save_and_reload() -> Result<()> {
    let dir = std::env::temp_dir().join("lessonform_editor_roundtrip");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("lesson.json");

    let mut document = Document::load_or_default(&path);
    let mut editor = Editor::with_default_plugins(document)?;

    editor.dispatch(&Command::InsertTrueOrFalse {
        payload: question("persisted"),
    })?;
    editor.dispatch(&Command::InsertFile {
        payload: FilePayload {
            src: "https://cdn.example.com/syllabus.pdf".into(),
            alt_text: "Syllabus".into(),
            metadata: FileMetadata {
                file_type: FileKind::Document,
                file_name: "syllabus.pdf".into(),
                size: Some(1024),
                width: None,
                height: None,
                max_width: None,
            },
        },
    })?;

    let uuids_before = editor.document().tree().uuids();
    editor.document_mut().save()?;

    document = Document::load(&path)?;
    assert!(document.integrity().is_clean());
    assert_eq!(document.tree().uuids(), uuids_before);
    assert_eq!(document.tree().children().len(), 4);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_load_or_default_recovers_from_corrupt_file() -> Result<()> {
    let dir = std::env::temp_dir().join("lessonform_editor_corrupt");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("broken.json");
    std::fs::write(&path, "{ not json")?;

    let document = Document::load_or_default(&path);
    assert_eq!(document.tree().children().len(), 0);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
