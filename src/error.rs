//! Error taxonomy for the compile pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while turning input documents into commentary records.
///
/// Only [`CompileError::DocumentParseError`] on a content document is
/// recoverable (the document is skipped); see [`CompileError::is_skippable`].
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("malformed verse range '{0}'")]
    MalformedVerseRange(String),

    #[error("no OSIS abbreviation known for book '{0}'")]
    UnknownBookAbbreviation(String),

    #[error("malformed filename {}: {reason}", path.display())]
    MalformedFilename { path: PathBuf, reason: String },

    #[error("incomplete author metadata for '{dir}' ({}): `{field}` is missing or not {expected}", path.display())]
    IncompleteAuthorMetadata {
        dir: String,
        path: PathBuf,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{}: commentary entry #{index} has no `quote`", path.display())]
    MissingQuoteField { path: PathBuf, index: usize },

    #[error("failed to parse {}: {reason}", path.display())]
    DocumentParseError { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk input tree: {0}")]
    Discovery(String),
}

impl CompileError {
    /// Whether a content document failing with this error may be skipped
    /// while the rest of the run continues.
    pub fn is_skippable(&self) -> bool {
        matches!(self, CompileError::DocumentParseError { .. })
    }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
