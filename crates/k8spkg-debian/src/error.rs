//! Error types for template parsing and rendering

use thiserror::Error;

/// Template specific errors, converted into
/// [`k8spkg_core::Error::Template`] once the file is known
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A referenced key is not part of the job configuration
    #[error("line {line}: map has no entry for key {key:?}")]
    MissingKey { key: String, line: usize },

    /// A called helper is not registered
    #[error("line {line}: function {name:?} not defined")]
    UnknownHelper { name: String, line: usize },

    /// Malformed action
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

impl TemplateError {
    /// Create a syntax error
    pub fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::Syntax { line, reason: reason.into() }
    }

    /// Whether the error is a reference to an absent key
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }
}
