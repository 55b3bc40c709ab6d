//! Error types for the core library

use std::path::PathBuf;

use thiserror::Error;

/// Error type shared by every stage of a packaging run
#[derive(Error, Debug)]
pub enum Error {
    /// Fetching a version manifest failed
    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// A version string could not be parsed
    #[error("Parse error for {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// A template could not be parsed or rendered
    #[error("Template error in {file}: {reason}")]
    Template { file: String, reason: String },

    /// Directory creation, copy, permission or move failure
    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The packaging subprocess failed to start or exited non-zero
    #[error("Process error running {command}: {reason}")]
    Process { command: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a network error
    pub fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network { url: url.into(), reason: reason.to_string() }
    }

    /// Create a parse error
    pub fn parse(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse { input: input.into(), reason: reason.to_string() }
    }

    /// Create a template error
    pub fn template(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::Template { file: file.into(), reason: reason.to_string() }
    }

    /// Create a filesystem error
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem { path: path.into(), source }
    }

    /// Create a process error
    pub fn process(command: impl Into<String>, reason: impl ToString) -> Self {
        Self::Process { command: command.into(), reason: reason.to_string() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template { .. })
    }

    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Filesystem { .. })
    }

    pub fn is_process(&self) -> bool {
        matches!(self, Self::Process { .. })
    }
}
