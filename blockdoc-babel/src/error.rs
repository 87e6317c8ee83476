//! Error types for conversion and registration

use crate::format::TargetFormat;
use blockdoc_model::ModelError;

/// Errors that abort a single conversion call.
///
/// Content-level problems (unknown blocks, unreadable spans) never show up here; they are
/// recovered locally and reported through [`crate::Diagnostics`].
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The block tree handed to an export is structurally invalid.
    #[error(transparent)]
    MalformedTree(#[from] ModelError),

    /// No codec was registered for the requested format.
    #[error("no codec registered for format '{0}'")]
    MissingCodec(TargetFormat),

    /// A format name that is not part of the supported set.
    #[error("unknown format '{0}' (expected one of: {1})")]
    UnknownFormat(String, String),

    /// An adapter was asked for a direction it does not implement.
    #[error("adapter for '{flavour}' does not support {operation} in {format}")]
    NotSupported {
        flavour: String,
        format: TargetFormat,
        operation: &'static str,
    },

    /// Printing the payload failed.
    #[error("{format} serialization failed: {message}")]
    Serialization {
        format: TargetFormat,
        message: String,
    },
}

/// Errors raised while composing the extension registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// A module supplied an extension that cannot be registered. The whole module is skipped.
    #[error("invalid extension in module '{module}': {reason}")]
    InvalidExtension { module: String, reason: String },

    /// The same module name was registered twice.
    #[error("module '{0}' is already registered")]
    DuplicateModule(String),
}

impl RegistrationError {
    pub fn module(&self) -> &str {
        match self {
            RegistrationError::InvalidExtension { module, .. } => module,
            RegistrationError::DuplicateModule(module) => module,
        }
    }
}
