//! Non-fatal conversion warnings
//!
//! Conversions always produce best-effort output. Anything that had to be skipped or degraded
//! is recorded here, in a sink owned by the caller, separately from the payload.

use crate::format::TargetFormat;
use blockdoc_model::BlockPath;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// No adapter for a (flavour, format) pair, or no adapter accepting an imported element.
    UnsupportedBlock,
    /// A fragment no matcher or codec could interpret; degraded to plain text.
    UnparseableFragment,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnsupportedBlock => f.write_str("unsupported block"),
            WarningKind::UnparseableFragment => f.write_str("unparseable fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub format: TargetFormat,
    /// Flavour (export) or tag (import) the warning is about.
    pub subject: String,
    /// Location in the exported tree, when known.
    pub path: Option<BlockPath>,
}

impl Warning {
    pub fn unsupported_block(format: TargetFormat, subject: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnsupportedBlock,
            format,
            subject: subject.into(),
            path: None,
        }
    }

    pub fn unparseable_fragment(format: TargetFormat, subject: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnparseableFragment,
            format,
            subject: subject.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: BlockPath) -> Self {
        self.path = Some(path);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' in {}", self.kind, self.subject, self.format)?;
        if let Some(path) = &self.path {
            write!(f, " at {}", path)?;
        }
        Ok(())
    }
}

/// Caller-supplied warning sink.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        warn!(kind = %warning.kind, format = %warning.format, subject = %warning.subject, "conversion warning");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |warning| warning.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let warning = Warning::unsupported_block(TargetFormat::Markdown, "kanban")
            .at(BlockPath::root().child(1));
        assert_eq!(warning.to_string(), "unsupported block 'kanban' in markdown at /1");
    }

    #[test]
    fn test_of_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Warning::unsupported_block(TargetFormat::Html, "a"));
        diagnostics.push(Warning::unparseable_fragment(TargetFormat::Html, "span"));
        diagnostics.push(Warning::unsupported_block(TargetFormat::Html, "b"));

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.of_kind(WarningKind::UnsupportedBlock).count(), 2);
    }
}
