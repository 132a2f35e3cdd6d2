//! Error types for the editor

use lessonform_nodes::{NodeError, NodeType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command error: {0}")]
    Command(#[from] crate::commands::CommandError),

    #[error("Document is not file-backed")]
    NotFileBacked,

    /// Plugin mount against a document whose registry lacks the node type.
    /// This is a programming/configuration error and fails fast at setup,
    /// not at first use.
    #[error("Node type {0:?} is not registered on this document")]
    NodeTypeNotRegistered(NodeType),
}
