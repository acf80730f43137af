//! Requirements: instructor-authored rules and their vocabulary.

pub mod behavior;
pub mod format;
pub mod requirement;
pub mod rules;
pub mod types;

pub use behavior::Behavior;
pub use format::FormatOptions;
pub use requirement::{AttributeMap, Requirement};
pub use rules::{RuleEntry, RuleSet};
pub use types::{Action, Compliance, RequirementType, TargetType};
