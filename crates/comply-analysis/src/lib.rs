//! comply-analysis: implementation-compliance checking for Java assignments.
//!
//! Compares a student's class against the starter code, method by method,
//! and evaluates instructor rules such as "union(BagInterface) must
//! instantiate LinkedBag(BagInterface)" or "add(T) must be left as is".
//!
//! - `parsers`: tree-sitter Java parsing into compilation units
//! - `methods`: method identity, signatures and per-class inventories
//! - `requirements`: rule vocabulary, requirements and TOML rule files
//! - `heuristics`: call/instantiation/statement facts with call resolution
//! - `compliance`: the checker, change classification and results
//! - `reporters`: text and JSON output

pub mod compliance;
pub mod heuristics;
pub mod locator;
pub mod methods;
pub mod parsers;
pub mod reporters;
pub mod requirements;

pub use compliance::{ComplianceResult, ImplementationComplianceChecker};
pub use locator::SourceLocator;
pub use methods::{MethodInfo, MethodKey};
pub use requirements::{Action, Behavior, Compliance, FormatOptions, Requirement, RequirementType, RuleSet, TargetType};
