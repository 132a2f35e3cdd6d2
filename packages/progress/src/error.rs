//! Error types for progress computation

use lessonform_nodes::NodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
