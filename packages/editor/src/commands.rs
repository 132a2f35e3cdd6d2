//! # Commands
//!
//! High-level semantic operations on lesson documents.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each command is one authoring gesture
//! 2. **Validated**: structural constraints are checked before any mutation
//! 3. **Atomic**: a command's whole effect (node + trailing paragraph +
//!    caret move) commits together or not at all
//!
//! ## Command Semantics
//!
//! ### Insert
//! - Placement follows the selection fallback chain (see [`Selection`]):
//!   after the current block when anchored, at document end otherwise
//! - A fresh empty paragraph is appended right after the new node and the
//!   caret moves to its start, so the author keeps typing without manually
//!   creating a block
//!
//! ### Edit
//! - Replace-in-place, not insert+delete: the replacement takes the old
//!   node's tree position, `key` and `uuid`, so learner progress recorded
//!   against the node survives content fixes

use crate::selection::Selection;
use lessonform_nodes::{
    FilePayload, ImagePayload, KeyGenerator, LessonDocument, LessonNode, MatchConceptsPayload,
    NodeKey, NodeType, TapToRevealPayload, TrueOrFalsePayload,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Semantic commands dispatched by authoring surfaces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    InsertTrueOrFalse { payload: TrueOrFalsePayload },
    InsertTapToReveal { payload: TapToRevealPayload },
    InsertMatchConcepts { payload: MatchConceptsPayload },
    InsertFile { payload: FilePayload },
    InsertImage { payload: ImagePayload },
    InsertPageBreak,

    EditTrueOrFalse { node_key: NodeKey, payload: TrueOrFalsePayload },
    EditTapToReveal { node_key: NodeKey, payload: TapToRevealPayload },
    EditMatchConcepts { node_key: NodeKey, payload: MatchConceptsPayload },
    EditFile { node_key: NodeKey, payload: FilePayload },
    EditImage { node_key: NodeKey, payload: ImagePayload },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node {key} is {found:?}, expected {expected:?}")]
    TypeMismatch {
        key: String,
        expected: NodeType,
        found: NodeType,
    },

    #[error("Match-concepts requires at least one item")]
    EmptyMatchItems,

    #[error("Duplicate node uuid within one document: {0}")]
    DuplicateUuid(Uuid),
}

/// Result of a committed command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// Document version after the commit
    pub version: u64,
    /// Key of the inserted or replaced node
    pub node_key: NodeKey,
    /// Where the caret sits after the commit
    pub selection: Selection,
}

pub(crate) struct CommandOutcome {
    pub node_key: NodeKey,
    pub selection: Selection,
}

impl Command {
    /// The node kind this command operates on
    pub fn node_type(&self) -> NodeType {
        match self {
            Command::InsertTrueOrFalse { .. } | Command::EditTrueOrFalse { .. } => {
                NodeType::TrueOrFalse
            }
            Command::InsertTapToReveal { .. } | Command::EditTapToReveal { .. } => {
                NodeType::TapToReveal
            }
            Command::InsertMatchConcepts { .. } | Command::EditMatchConcepts { .. } => {
                NodeType::MatchConcepts
            }
            Command::InsertFile { .. } | Command::EditFile { .. } => NodeType::File,
            Command::InsertImage { .. } | Command::EditImage { .. } => NodeType::Image,
            Command::InsertPageBreak => NodeType::PageBreak,
        }
    }

    fn edit_target(&self) -> Option<&NodeKey> {
        match self {
            Command::EditTrueOrFalse { node_key, .. }
            | Command::EditTapToReveal { node_key, .. }
            | Command::EditMatchConcepts { node_key, .. }
            | Command::EditFile { node_key, .. }
            | Command::EditImage { node_key, .. } => Some(node_key),
            _ => None,
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &LessonDocument) -> Result<(), CommandError> {
        if let Command::InsertMatchConcepts { payload } | Command::EditMatchConcepts { payload, .. } =
            self
        {
            if payload.items.is_empty() {
                return Err(CommandError::EmptyMatchItems);
            }
        }

        if let Some(node_key) = self.edit_target() {
            let node = doc
                .find_by_key(node_key)
                .ok_or_else(|| CommandError::NodeNotFound(node_key.clone()))?;
            if node.node_type() != self.node_type() {
                return Err(CommandError::TypeMismatch {
                    key: node_key.clone(),
                    expected: self.node_type(),
                    found: node.node_type(),
                });
            }
        }

        Ok(())
    }

    /// Apply to a working tree. The caller owns transactionality: it hands
    /// in a copy and commits only on success.
    pub(crate) fn apply(
        &self,
        tree: &mut LessonDocument,
        keys: &mut KeyGenerator,
        selection: &Selection,
    ) -> Result<CommandOutcome, CommandError> {
        self.validate(tree)?;

        match self {
            Command::InsertTrueOrFalse { payload } => {
                insert(tree, keys, selection, LessonNode::true_or_false(payload.clone()))
            }
            Command::InsertTapToReveal { payload } => {
                insert(tree, keys, selection, LessonNode::tap_to_reveal(payload.clone()))
            }
            Command::InsertMatchConcepts { payload } => {
                insert(tree, keys, selection, LessonNode::match_concepts(payload.clone()))
            }
            Command::InsertFile { payload } => {
                insert(tree, keys, selection, LessonNode::file(payload.clone()))
            }
            Command::InsertImage { payload } => {
                insert(tree, keys, selection, LessonNode::image(payload.clone()))
            }
            Command::InsertPageBreak => insert(tree, keys, selection, LessonNode::page_break()),

            Command::EditTrueOrFalse { node_key, payload } => {
                replace(tree, node_key, LessonNode::true_or_false(payload.clone()), selection)
            }
            Command::EditTapToReveal { node_key, payload } => {
                replace(tree, node_key, LessonNode::tap_to_reveal(payload.clone()), selection)
            }
            Command::EditMatchConcepts { node_key, payload } => {
                replace(tree, node_key, LessonNode::match_concepts(payload.clone()), selection)
            }
            Command::EditFile { node_key, payload } => {
                replace(tree, node_key, LessonNode::file(payload.clone()), selection)
            }
            Command::EditImage { node_key, payload } => {
                replace(tree, node_key, LessonNode::image(payload.clone()), selection)
            }
        }
    }
}

/// Attach a node to the tree at the selection's insertion point, then
/// append the trailing empty paragraph and move the caret into it
fn insert(
    tree: &mut LessonDocument,
    keys: &mut KeyGenerator,
    selection: &Selection,
    mut node: LessonNode,
) -> Result<CommandOutcome, CommandError> {
    if let Some(uuid) = node.uuid() {
        if tree.find_by_uuid(uuid).is_some() {
            return Err(CommandError::DuplicateUuid(uuid));
        }
    }

    let index = selection.insertion_index(tree.children().len());
    node.set_key(keys.next_key());
    let node_key = node.key().clone();
    tree.children_mut().insert(index, node);

    let mut paragraph = LessonNode::empty_paragraph();
    paragraph.set_key(keys.next_key());
    tree.children_mut().insert(index + 1, paragraph);

    Ok(CommandOutcome {
        node_key,
        selection: Selection::caret_in_text(index + 1),
    })
}

/// Replace-in-place, carrying the old node's identity forward
fn replace(
    tree: &mut LessonDocument,
    node_key: &NodeKey,
    mut replacement: LessonNode,
    selection: &Selection,
) -> Result<CommandOutcome, CommandError> {
    let position = tree
        .position_of_key(node_key)
        .ok_or_else(|| CommandError::NodeNotFound(node_key.clone()))?;

    replacement.adopt_identity(&tree.children()[position]);
    tree.children_mut()[position] = replacement;

    Ok(CommandOutcome {
        node_key: node_key.clone(),
        selection: *selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonform_nodes::RichTextState;

    fn question() -> TrueOrFalsePayload {
        TrueOrFalsePayload {
            question_state: RichTextState::paragraph_root("q"),
            correct_answer: true,
            hint: None,
            explanation_state: RichTextState::paragraph_root("e"),
        }
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::InsertTrueOrFalse { payload: question() };
        let json = serde_json::to_string(&command).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_validation_rejects_unknown_edit_target() {
        let doc = LessonDocument::empty();
        let command = Command::EditTrueOrFalse {
            node_key: "missing-1".to_string(),
            payload: question(),
        };
        assert!(matches!(
            command.validate(&doc),
            Err(CommandError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_match_items() {
        let command = Command::InsertMatchConcepts {
            payload: MatchConceptsPayload {
                title: RichTextState::paragraph_root("t"),
                items: vec![],
            },
        };
        assert_eq!(
            command.validate(&LessonDocument::empty()),
            Err(CommandError::EmptyMatchItems)
        );
    }

    #[test]
    fn test_insert_appends_trailing_paragraph() {
        let mut tree = LessonDocument::empty();
        let mut keys = KeyGenerator::new("/t.lesson");
        let command = Command::InsertPageBreak;

        let outcome = command
            .apply(&mut tree, &mut keys, &Selection::None)
            .unwrap();

        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[0].node_type(), NodeType::PageBreak);
        assert_eq!(tree.children()[1].node_type(), NodeType::RichText);
        assert_eq!(outcome.selection, Selection::caret_in_text(1));
    }
}
