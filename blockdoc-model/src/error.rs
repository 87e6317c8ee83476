//! Error types for document model operations

use crate::block::BlockPath;

/// Errors raised while reading or validating a block tree
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The tree is structurally invalid (e.g. a block without a flavour).
    #[error("malformed block tree at {path}: {reason}")]
    MalformedTree { path: BlockPath, reason: String },

    /// The JSON payload is not valid JSON at all.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub fn malformed(path: BlockPath, reason: impl Into<String>) -> Self {
        ModelError::MalformedTree {
            path,
            reason: reason.into(),
        }
    }
}
