//! Closed vocabularies for rules: what must happen, how strictly, and to what.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use comply_core::errors::RuleError;

/// What a rule is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Call,
    Instantiate,
    SetValue,
    GetValue,
    Define,
    Undefine,
    Add,
    Delete,
    Modify,
    LeaveAsIs,
    Use,
    Try,
    TryWithResources,
    Throw,
    Catch,
    Finally,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Self::Call,
        Self::Instantiate,
        Self::SetValue,
        Self::GetValue,
        Self::Define,
        Self::Undefine,
        Self::Add,
        Self::Delete,
        Self::Modify,
        Self::LeaveAsIs,
        Self::Use,
        Self::Try,
        Self::TryWithResources,
        Self::Throw,
        Self::Catch,
        Self::Finally,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Instantiate => "INSTANTIATE",
            Self::SetValue => "SET_VALUE",
            Self::GetValue => "GET_VALUE",
            Self::Define => "DEFINE",
            Self::Undefine => "UNDEFINE",
            Self::Add => "ADD",
            Self::Delete => "DELETE",
            Self::Modify => "MODIFY",
            Self::LeaveAsIs => "LEAVE_AS_IS",
            Self::Use => "USE",
            Self::Try => "TRY",
            Self::TryWithResources => "TRY_WITH_RESOURCES",
            Self::Throw => "THROW",
            Self::Catch => "CATCH",
            Self::Finally => "FINALLY",
        }
    }

    /// Whether a requirement with this action is meaningless without a target.
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            Self::Call
                | Self::Instantiate
                | Self::SetValue
                | Self::GetValue
                | Self::Define
                | Self::Undefine
                | Self::Use
        )
    }

    /// Whether this action never carries a target: it refers to the
    /// configured method itself or to a statement form with no operand.
    pub fn is_targetless(&self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Delete
                | Self::Modify
                | Self::LeaveAsIs
                | Self::Try
                | Self::TryWithResources
                | Self::Finally
        )
    }

    /// The change bucket a method is expected to land in when this action
    /// is demanded of it.
    pub fn expected_change(&self) -> Action {
        match self {
            Self::Add => Self::Add,
            Self::Delete => Self::Delete,
            Self::LeaveAsIs => Self::LeaveAsIs,
            Self::Call
            | Self::Instantiate
            | Self::GetValue
            | Self::SetValue
            | Self::Modify
            | Self::Throw
            | Self::Catch
            | Self::Define
            | Self::Undefine
            | Self::Use
            | Self::Try
            | Self::TryWithResources
            | Self::Finally => Self::Modify,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = enum_token(s);
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| RuleError::UnknownAction(s.to_string()))
    }
}

/// How strictly a rule is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementType {
    Must,
    MustNot,
    Requires,
    Prohibits,
    Optionally,
    Custom,
}

impl RequirementType {
    pub const ALL: [RequirementType; 6] = [
        Self::Must,
        Self::MustNot,
        Self::Requires,
        Self::Prohibits,
        Self::Optionally,
        Self::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::MustNot => "MUST_NOT",
            Self::Requires => "REQUIRES",
            Self::Prohibits => "PROHIBITS",
            Self::Optionally => "OPTIONALLY",
            Self::Custom => "CUSTOM",
        }
    }

    /// MUST and MUST_NOT are enforced directly against a single fact.
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Must | Self::MustNot)
    }

    /// Negative types are satisfied when the behavior does not occur.
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::MustNot | Self::Prohibits)
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RequirementType {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = enum_token(s);
        Self::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| RuleError::UnknownRequirementType(s.to_string()))
    }
}

/// What kind of code element a requirement's target names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Method,
    Constructor,
    GloballyApplicable,
    /// Reserved; requirements with this target type are rejected.
    Annotation,
}

impl TargetType {
    pub const ALL: [TargetType; 4] = [
        Self::Method,
        Self::Constructor,
        Self::GloballyApplicable,
        Self::Annotation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Method => "METHOD",
            Self::Constructor => "CONSTRUCTOR",
            Self::GloballyApplicable => "GLOBALLY_APPLICABLE",
            Self::Annotation => "ANNOTATION",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetType {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = enum_token(s);
        Self::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| RuleError::UnknownTargetType(s.to_string()))
    }
}

/// Verdict of a requirement or a whole method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compliance {
    #[default]
    Unknown,
    Passed,
    Failed,
    NotChecked,
}

impl Compliance {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::NotChecked => "NOT_CHECKED",
        }
    }

    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compliance {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_token(s).as_str() {
            "UNKNOWN" => Ok(Self::Unknown),
            "PASSED" => Ok(Self::Passed),
            "FAILED" => Ok(Self::Failed),
            "NOT_CHECKED" => Ok(Self::NotChecked),
            _ => Err(RuleError::UnknownCompliance(s.to_string())),
        }
    }
}

/// Accepts `MUST_NOT`, `must_not`, `must-not`, and `Must Not` alike.
fn enum_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_accepts_any_case() {
        assert_eq!("leave_as_is".parse::<Action>().unwrap(), Action::LeaveAsIs);
        assert_eq!("TRY-WITH-RESOURCES".parse::<Action>().unwrap(), Action::TryWithResources);
        assert!("jump".parse::<Action>().is_err());
    }

    #[test]
    fn test_every_action_round_trips_through_its_name() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_expected_change_buckets() {
        assert_eq!(Action::Add.expected_change(), Action::Add);
        assert_eq!(Action::Delete.expected_change(), Action::Delete);
        assert_eq!(Action::LeaveAsIs.expected_change(), Action::LeaveAsIs);
        assert_eq!(Action::Instantiate.expected_change(), Action::Modify);
        assert_eq!(Action::Undefine.expected_change(), Action::Modify);
    }

    #[test]
    fn test_requirement_type_flags() {
        assert!(RequirementType::Must.is_simple());
        assert!(!RequirementType::Requires.is_simple());
        assert!(RequirementType::Prohibits.is_negative());
        assert!(!RequirementType::Optionally.is_negative());
    }

    #[test]
    fn test_compliance_serializes_screaming_case() {
        let json = serde_json::to_string(&Compliance::NotChecked).unwrap();
        assert_eq!(json, "\"NOT_CHECKED\"");
    }
}
