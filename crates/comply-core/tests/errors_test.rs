//! Tests for the error handling system.

use std::path::PathBuf;

use comply_core::errors::error_code::{self, ComplyErrorCode};
use comply_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let config = ConfigError::ReadFailed {
        path: PathBuf::from("/tmp/comply.toml"),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);

    let parse = ParseError::TreeSitterError {
        path: PathBuf::from("A.java"),
        message: "boom".into(),
    };
    assert_eq!(parse.error_code(), error_code::PARSE_ERROR);

    let rule = RuleError::UnknownAction("jump".into());
    assert_eq!(rule.error_code(), error_code::RULE_CONFIG_ERROR);

    let unsupported = RuleError::UnsupportedTargetType {
        target_type: "ANNOTATION".into(),
    };
    assert_eq!(unsupported.error_code(), error_code::UNSUPPORTED);
}

#[test]
fn test_compliance_error_codes() {
    let missing = ComplianceError::SourceNotFound {
        category: SourceCategory::Student,
        path: PathBuf::from("student/LinkedBag.java"),
    };
    assert_eq!(missing.error_code(), error_code::SOURCE_NOT_FOUND);
    assert!(missing.to_string().starts_with("student source not found"));

    let mismatch = ComplianceError::ActionMismatch {
        evaluator: "CALL".into(),
        found: "INSTANTIATE".into(),
    };
    assert_eq!(mismatch.error_code(), error_code::INTERNAL_INVARIANT);

    let chained = ComplianceError::MultipleConstructorCalls {
        constructor: "LinkedBag()".into(),
        count: 2,
    };
    assert_eq!(chained.error_code(), error_code::INTERNAL_INVARIANT);

    let unsupported = ComplianceError::Unsupported {
        action: "CALL".into(),
        requirement_type: "REQUIRES".into(),
    };
    assert_eq!(unsupported.error_code(), error_code::UNSUPPORTED);
}

#[test]
fn test_from_conversions_keep_inner_code() {
    let err: ComplianceError = RuleError::UnknownRequirementType("SHOULD".into()).into();
    assert_eq!(err.error_code(), error_code::RULE_CONFIG_ERROR);

    let err: ComplianceError = ConfigError::InvalidValue {
        field: "report.format".into(),
        message: "bad".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn test_coded_string_format() {
    let err = ComplianceError::MissingTarget {
        action: "CALL".into(),
    };
    let s = err.coded_string();
    assert!(s.starts_with("[RULE_CONFIG_ERROR] "));
    assert!(s.contains("CALL"));
}
