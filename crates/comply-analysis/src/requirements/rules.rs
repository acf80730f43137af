//! Declarative TOML rule files: requirements attached to method signatures
//! without recompiling the grading harness.
//!
//! ```toml
//! no_requirements = ["toString()"]
//!
//! [[rules]]
//! signature = "union(BagInterface<T>)"
//! requirement_type = "MUST"
//! action = "INSTANTIATE"
//! target_type = "CONSTRUCTOR"
//! target = "LinkedBag(BagInterface)"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use comply_core::errors::RuleError;

use super::requirement::{AttributeMap, Requirement};
use super::types::{Action, RequirementType, TargetType};
use crate::methods::signature::canonical_signature;

/// One `[[rules]]` entry as written in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlRuleDef {
    pub signature: String,
    pub requirement_type: String,
    pub action: String,
    #[serde(default = "default_target_type")]
    pub target_type: String,
    pub target: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub args: AttributeMap,
    #[serde(default)]
    pub grading: AttributeMap,
}

fn default_target_type() -> String {
    TargetType::Method.name().to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlRuleFile {
    #[serde(default)]
    pub rules: Vec<TomlRuleDef>,
    /// Signatures deliberately left without rules.
    #[serde(default)]
    pub no_requirements: Vec<String>,
}

/// A validated requirement bound to the canonical signature it applies to.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub signature: String,
    pub requirement: Requirement,
}

/// Requirements loaded from a rule file, in file order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<RuleEntry>,
    pub no_requirements: Vec<String>,
}

impl RuleSet {
    /// Load rules from a TOML string. Disabled rules are skipped.
    pub fn load_from_str(toml_str: &str) -> Result<Self, RuleError> {
        Self::parse(toml_str, "<string>")
    }

    /// Load rules from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path).map_err(|e| RuleError::ParseError {
            path: path.display().to_string(),
            message: format!("failed to read: {e}"),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(toml_str: &str, origin: &str) -> Result<Self, RuleError> {
        let file: TomlRuleFile = toml::from_str(toml_str).map_err(|e| RuleError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        let mut set = RuleSet {
            rules: Vec::with_capacity(file.rules.len()),
            no_requirements: file
                .no_requirements
                .iter()
                .map(|s| canonical_signature(s))
                .collect(),
        };
        for def in file.rules {
            if def.enabled == Some(false) {
                tracing::debug!(signature = %def.signature, action = %def.action, "skipping disabled rule");
                continue;
            }
            set.rules.push(Self::compile(def)?);
        }
        Ok(set)
    }

    fn compile(def: TomlRuleDef) -> Result<RuleEntry, RuleError> {
        let action: Action = def.action.parse()?;
        let requirement_type: RequirementType = def.requirement_type.parse()?;
        let target_type: TargetType = def.target_type.parse()?;

        let mut requirement =
            Requirement::new(action, requirement_type, target_type, def.target.as_deref())?;
        requirement.args_mut().extend(def.args);
        requirement.grading_mut().extend(def.grading);

        Ok(RuleEntry {
            signature: canonical_signature(&def.signature),
            requirement,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.no_requirements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::Behavior;

    #[test]
    fn test_load_rules_in_file_order() {
        let set = RuleSet::load_from_str(
            r#"
no_requirements = ["toString( )"]

[[rules]]
signature = "union(BagInterface<T> other)"
requirement_type = "MUST"
action = "INSTANTIATE"
target_type = "CONSTRUCTOR"
target = "LinkedBag(BagInterface)"

[rules.grading]
points = 2

[[rules]]
signature = "add(T)"
requirement_type = "must"
action = "leave_as_is"
target_type = "globally_applicable"

[[rules]]
signature = "clear()"
requirement_type = "MUST"
action = "MODIFY"
enabled = false
"#,
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.no_requirements, vec!["toString()"]);
        assert_eq!(set.rules[0].signature, "union(BagInterface<T>)");
        assert_eq!(set.rules[0].requirement.behavior(), Behavior::MUST_INSTANTIATE);
        assert_eq!(set.rules[0].requirement.grading()["points"], 2);
        assert_eq!(set.rules[1].requirement, Requirement::do_leave_everything_as_is());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = RuleSet::load_from_str(
            r#"
[[rules]]
signature = "add(T)"
requirement_type = "MUST"
action = "REFACTOR"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::UnknownAction(a) if a == "REFACTOR"));
    }

    #[test]
    fn test_call_without_target_is_rejected() {
        let err = RuleSet::load_from_str(
            r#"
[[rules]]
signature = "add(T)"
requirement_type = "MUST"
action = "CALL"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::MissingTarget { .. }));
    }

    #[test]
    fn test_malformed_toml_reports_origin() {
        let err = RuleSet::load_from_str("[[rules]\n").unwrap_err();
        assert!(matches!(err, RuleError::ParseError { path, .. } if path == "<string>"));
    }
}
