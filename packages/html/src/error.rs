use thiserror::Error;

/// Errors that can occur while building DOM output
#[derive(Error, Debug)]
pub enum DomError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DOM export error: {0}")]
    Generic(String),
}

impl From<String> for DomError {
    fn from(s: String) -> Self {
        DomError::Generic(s)
    }
}

impl From<&str> for DomError {
    fn from(s: &str) -> Self {
        DomError::Generic(s.to_string())
    }
}
