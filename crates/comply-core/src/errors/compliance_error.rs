//! Compliance run errors. Anything returned from `analyze()` aborts the run.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error_code::{self, ComplyErrorCode};
use super::{ConfigError, ParseError, RuleError};

/// Which side of the diff a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    Starter,
    Student,
    Support,
}

impl SourceCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Student => "student",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that abort a compliance analysis run.
///
/// Resolution failures never appear here: they are absorbed inside the
/// heuristics and count as a non-matching call.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error("{category} source not found: {path}")]
    SourceNotFound {
        category: SourceCategory,
        path: PathBuf,
    },

    #[error("class '{class_name}' is not declared in the {category} source")]
    ClassNotFound {
        category: SourceCategory,
        class_name: String,
    },

    #[error("evaluator for {evaluator} was handed a requirement with action {found}")]
    ActionMismatch { evaluator: String, found: String },

    #[error("requirement type {requirement_type} is not supported for action {action}")]
    Unsupported {
        action: String,
        requirement_type: String,
    },

    #[error("constructor {constructor} contains {count} explicit constructor invocations, at most one is possible")]
    MultipleConstructorCalls { constructor: String, count: usize },

    #[error("action {action} needs a target signature but none was configured")]
    MissingTarget { action: String },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ComplyErrorCode for ComplianceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => error_code::SOURCE_NOT_FOUND,
            Self::ClassNotFound { .. } => error_code::CLASS_NOT_FOUND,
            Self::ActionMismatch { .. } | Self::MultipleConstructorCalls { .. } => {
                error_code::INTERNAL_INVARIANT
            }
            Self::Unsupported { .. } => error_code::UNSUPPORTED,
            Self::MissingTarget { .. } => error_code::RULE_CONFIG_ERROR,
            Self::Parse(e) => e.error_code(),
            Self::Rule(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
