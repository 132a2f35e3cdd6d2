//! Error types for the node model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    /// The `type` tag names no registered node kind. Callers decide whether
    /// to skip, substitute a placeholder, or abort.
    #[error("Unsupported node type: {0}")]
    UnsupportedType(String),

    #[error("Invalid node shape: {0}")]
    InvalidShape(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NodeError {
    /// True when the error is the registry's "unsupported node" miss rather
    /// than a malformed payload.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, NodeError::UnsupportedType(_))
    }
}
