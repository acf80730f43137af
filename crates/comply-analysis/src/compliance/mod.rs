//! Compliance checking: change classification, requirement evaluation,
//! and the aggregate result.

pub mod checker;
pub mod classify;
pub mod evaluate;
pub mod result;

pub use checker::{CheckerOptions, ImplementationComplianceChecker};
pub use classify::{actual_change, classify_actual, expected_change};
pub use evaluate::{enforce, evaluate_requirement, MethodSubject};
pub use result::{
    ChangeMismatch, ComplianceCounters, ComplianceResult, EvaluationStatus, MethodEvaluation, SourceInfo,
};
