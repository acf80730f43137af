//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, ComplyErrorCode};

/// Errors that can occur while reading and parsing a source file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to load grammar: {message}")]
    GrammarLoad { message: String },

    #[error("Tree-sitter error parsing {path}: {message}")]
    TreeSitterError { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ComplyErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => error_code::IO_ERROR,
            _ => error_code::PARSE_ERROR,
        }
    }
}
