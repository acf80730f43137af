//! Rule configuration errors: malformed or contradictory requirements.

use super::error_code::{self, ComplyErrorCode};

/// Errors raised while building requirements, in code or from rule files.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown requirement type: {0}")]
    UnknownRequirementType(String),

    #[error("Unknown target type: {0}")]
    UnknownTargetType(String),

    #[error("Unknown compliance value: {0}")]
    UnknownCompliance(String),

    #[error("Action {action} requires a target signature")]
    MissingTarget { action: String },

    #[error("Action {action} does not take a target, got '{target}'")]
    UnexpectedTarget { action: String, target: String },

    #[error("Target type {target_type} is not supported")]
    UnsupportedTargetType { target_type: String },

    #[error("Invalid signature '{signature}': {message}")]
    InvalidSignature { signature: String, message: String },

    #[error("Rule file parse error in {path}: {message}")]
    ParseError { path: String, message: String },
}

impl ComplyErrorCode for RuleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedTargetType { .. } => error_code::UNSUPPORTED,
            _ => error_code::RULE_CONFIG_ERROR,
        }
    }
}
