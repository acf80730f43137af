//! Requirement: one instructor-authored rule attached to a method signature.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use comply_core::errors::RuleError;

use super::behavior::Behavior;
use super::format::FormatOptions;
use super::types::{Action, Compliance, RequirementType, TargetType};
use crate::methods::signature::Signature;

/// Free-form, forward-compatible attribute bag.
pub type AttributeMap = BTreeMap<String, Value>;

/// A behavior, what it applies to, and the verdict of the last evaluation.
///
/// Identity is `(behavior, target_type, target)`: the verdict and the
/// attribute maps are mutable state and do not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    behavior: Behavior,
    target_type: TargetType,
    target: Option<String>,
    compliance: Compliance,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    args: AttributeMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    grading: AttributeMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extensions: AttributeMap,
}

impl Requirement {
    /// Build a validated requirement.
    ///
    /// Rejects reserved target types, targets on targetless actions,
    /// missing targets on actions that need one, and unparseable
    /// call/instantiation signatures.
    pub fn new(
        action: Action,
        requirement_type: RequirementType,
        target_type: TargetType,
        target: Option<&str>,
    ) -> Result<Self, RuleError> {
        Self::with_behavior(Behavior::new(requirement_type, action), target_type, target)
    }

    pub fn with_behavior(
        behavior: Behavior,
        target_type: TargetType,
        target: Option<&str>,
    ) -> Result<Self, RuleError> {
        let action = behavior.action();
        if target_type == TargetType::Annotation {
            return Err(RuleError::UnsupportedTargetType {
                target_type: target_type.to_string(),
            });
        }

        let has_target = target.is_some_and(|t| !t.trim().is_empty());
        if let Some(t) = target.filter(|_| has_target) {
            if action.is_targetless() || target_type == TargetType::GloballyApplicable {
                return Err(RuleError::UnexpectedTarget {
                    action: action.to_string(),
                    target: t.to_string(),
                });
            }
            if matches!(action, Action::Call | Action::Instantiate) {
                Signature::parse(t)?;
            }
        } else if action.requires_target() {
            return Err(RuleError::MissingTarget {
                action: action.to_string(),
            });
        }

        Ok(Self::unchecked(
            behavior,
            target_type,
            target.filter(|_| has_target).map(str::to_string),
        ))
    }

    fn unchecked(behavior: Behavior, target_type: TargetType, target: Option<String>) -> Self {
        Self {
            behavior,
            target_type,
            target,
            compliance: Compliance::Unknown,
            args: AttributeMap::new(),
            grading: AttributeMap::new(),
            extensions: AttributeMap::new(),
        }
    }

    /// The method must stay byte-for-byte as in the starter code.
    pub fn do_not_modify_method() -> Self {
        Self::unchecked(Behavior::MUST_LEAVE_AS_IS, TargetType::Method, None)
    }

    /// Nothing about the method may change.
    pub fn do_leave_everything_as_is() -> Self {
        Self::unchecked(Behavior::MUST_LEAVE_AS_IS, TargetType::GloballyApplicable, None)
    }

    pub fn must_add_method() -> Self {
        Self::unchecked(Behavior::MUST_ADD, TargetType::Method, None)
    }

    pub fn must_delete_method() -> Self {
        Self::unchecked(Behavior::MUST_DELETE, TargetType::Method, None)
    }

    pub fn must_modify_method() -> Self {
        Self::unchecked(Behavior::MUST_MODIFY, TargetType::Method, None)
    }

    pub fn optionally_modify_method() -> Self {
        Self::unchecked(Behavior::OPTIONALLY_MODIFY, TargetType::Method, None)
    }

    pub fn must_call_method(signature: &str) -> Result<Self, RuleError> {
        Self::with_behavior(Behavior::MUST_CALL, TargetType::Method, Some(signature))
    }

    pub fn must_not_call_method(signature: &str) -> Result<Self, RuleError> {
        Self::with_behavior(Behavior::MUST_NOT_CALL, TargetType::Method, Some(signature))
    }

    pub fn optionally_call_method(signature: &str) -> Result<Self, RuleError> {
        Self::with_behavior(Behavior::OPTIONALLY_CALL, TargetType::Method, Some(signature))
    }

    /// `this(...)` / `super(...)` chaining to the given constructor.
    pub fn must_call_constructor(signature: &str) -> Result<Self, RuleError> {
        Self::with_behavior(Behavior::MUST_CALL, TargetType::Constructor, Some(signature))
    }

    pub fn must_instantiate(signature: &str) -> Result<Self, RuleError> {
        Self::with_behavior(Behavior::MUST_INSTANTIATE, TargetType::Constructor, Some(signature))
    }

    pub fn must_not_instantiate(signature: &str) -> Result<Self, RuleError> {
        Self::with_behavior(
            Behavior::MUST_NOT_INSTANTIATE,
            TargetType::Constructor,
            Some(signature),
        )
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn action(&self) -> Action {
        self.behavior.action()
    }

    pub fn requirement_type(&self) -> RequirementType {
        self.behavior.requirement_type()
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn compliance(&self) -> Compliance {
        self.compliance
    }

    pub fn set_compliance(&mut self, compliance: Compliance) {
        self.compliance = compliance;
    }

    pub fn args(&self) -> &AttributeMap {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut AttributeMap {
        &mut self.args
    }

    pub fn grading(&self) -> &AttributeMap {
        &self.grading
    }

    pub fn grading_mut(&mut self) -> &mut AttributeMap {
        &mut self.grading
    }

    pub fn extensions(&self) -> &AttributeMap {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut AttributeMap {
        &mut self.extensions
    }

    /// Render for reports, e.g. `MUST INSTANTIATE CONSTRUCTOR LinkedBag(BagInterface) [FAILED]`.
    pub fn render(&self, options: &FormatOptions) -> String {
        let mut out = format!("{} {}", self.behavior, self.target_type);
        if let Some(ref target) = self.target {
            out.push(' ');
            out.push_str(target);
        }
        if options.include_compliance {
            out.push_str(&format!(" [{}]", self.compliance));
        }
        out
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.behavior == other.behavior
            && self.target_type == other.target_type
            && self.target == other.target
    }
}

impl Eq for Requirement {}

impl Hash for Requirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.behavior.hash(state);
        self.target_type.hash(state);
        self.target.hash(state);
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&FormatOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_accessors_reproduce_constructor_arguments() {
        let req = Requirement::new(
            Action::Instantiate,
            RequirementType::Must,
            TargetType::Constructor,
            Some("LinkedBag(BagInterface)"),
        )
        .unwrap();
        assert_eq!(req.action(), Action::Instantiate);
        assert_eq!(req.requirement_type(), RequirementType::Must);
        assert_eq!(req.target_type(), TargetType::Constructor);
        assert_eq!(req.target(), Some("LinkedBag(BagInterface)"));
        assert_eq!(req.compliance(), Compliance::Unknown);
    }

    #[test]
    fn test_identity_ignores_compliance() {
        let a = Requirement::must_call_method("add(T)").unwrap();
        let mut b = a.clone();
        b.set_compliance(Compliance::Failed);
        b.args_mut().insert("weight".into(), Value::from(2));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_call_without_target_is_rejected() {
        let err = Requirement::new(Action::Call, RequirementType::Must, TargetType::Method, None)
            .unwrap_err();
        assert!(matches!(err, RuleError::MissingTarget { .. }));
    }

    #[test]
    fn test_leave_as_is_with_target_is_rejected() {
        let err = Requirement::new(
            Action::LeaveAsIs,
            RequirementType::Must,
            TargetType::Method,
            Some("add(T)"),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::UnexpectedTarget { .. }));
    }

    #[test]
    fn test_statement_forms_reject_targets() {
        for action in [Action::Try, Action::TryWithResources, Action::Finally] {
            let err = Requirement::new(action, RequirementType::Must, TargetType::Method, Some("IOException"))
                .unwrap_err();
            assert!(matches!(err, RuleError::UnexpectedTarget { .. }), "{action}");
            let ok = Requirement::new(action, RequirementType::Must, TargetType::Method, None).unwrap();
            assert_eq!(ok.target(), None);
        }
    }

    #[test]
    fn test_annotation_target_type_is_unsupported() {
        let err = Requirement::new(
            Action::Use,
            RequirementType::Must,
            TargetType::Annotation,
            Some("Override"),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedTargetType { .. }));
    }

    #[test]
    fn test_malformed_call_signature_is_rejected() {
        let err = Requirement::must_call_method("add(T").unwrap_err();
        assert!(matches!(err, RuleError::InvalidSignature { .. }));
    }

    #[test]
    fn test_render_respects_format_options() {
        let mut req = Requirement::must_instantiate("LinkedBag(BagInterface)").unwrap();
        req.set_compliance(Compliance::Failed);

        let with = req.render(&FormatOptions::new(true, 2));
        assert_eq!(with, "MUST INSTANTIATE CONSTRUCTOR LinkedBag(BagInterface) [FAILED]");

        let without = req.render(&FormatOptions::new(false, 2));
        assert_eq!(without, "MUST INSTANTIATE CONSTRUCTOR LinkedBag(BagInterface)");
    }

    #[test]
    fn test_prebuilt_constants_have_no_target() {
        assert_eq!(Requirement::do_leave_everything_as_is().target(), None);
        assert_eq!(
            Requirement::do_leave_everything_as_is().target_type(),
            TargetType::GloballyApplicable
        );
        assert_eq!(Requirement::do_not_modify_method().action(), Action::LeaveAsIs);
    }
}
