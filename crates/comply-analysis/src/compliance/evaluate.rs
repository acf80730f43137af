//! Per-action requirement evaluators.
//!
//! Every evaluator computes whether its behavior occurred and maps that
//! fact through the requirement type.

use comply_core::errors::ComplianceError;

use crate::heuristics::{self, statements, CallableContext};
use crate::requirements::{Action, Requirement, RequirementType, TargetType};

/// The method under evaluation as seen from both sources.
#[derive(Clone, Copy)]
pub struct MethodSubject<'a> {
    pub signature: &'a str,
    pub student: Option<CallableContext<'a>>,
    pub starter: Option<CallableContext<'a>>,
    pub actual_change: Option<Action>,
}

/// Evaluate one requirement against a method. `Ok(true)` means it passed.
pub fn evaluate_requirement(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    let passed = match requirement.action() {
        Action::Call => evaluate_call(subject, requirement)?,
        Action::Instantiate => evaluate_instantiate(subject, requirement)?,
        Action::SetValue => evaluate_set_value(subject, requirement)?,
        Action::GetValue => evaluate_get_value(subject, requirement)?,
        Action::Define => evaluate_define(subject, requirement)?,
        Action::Undefine => evaluate_undefine(subject, requirement)?,
        Action::Add => evaluate_change(subject, requirement, Action::Add)?,
        Action::Delete => evaluate_change(subject, requirement, Action::Delete)?,
        Action::Modify => evaluate_change(subject, requirement, Action::Modify)?,
        Action::LeaveAsIs => evaluate_change(subject, requirement, Action::LeaveAsIs)?,
        Action::Use => evaluate_use(subject, requirement)?,
        Action::Try => evaluate_try(subject, requirement)?,
        Action::TryWithResources => evaluate_try_with_resources(subject, requirement)?,
        Action::Throw => evaluate_throw(subject, requirement)?,
        Action::Catch => evaluate_catch(subject, requirement)?,
        Action::Finally => evaluate_finally(subject, requirement)?,
    };
    tracing::debug!(
        signature = subject.signature,
        requirement = %requirement.render(&Default::default()),
        passed,
        "evaluated requirement"
    );
    Ok(passed)
}

/// MUST/REQUIRES demand the fact, MUST_NOT/PROHIBITS its absence,
/// OPTIONALLY/CUSTOM always pass.
pub fn enforce(requirement_type: RequirementType, fact: bool) -> bool {
    match requirement_type {
        RequirementType::Must | RequirementType::Requires => fact,
        RequirementType::MustNot | RequirementType::Prohibits => !fact,
        RequirementType::Optionally | RequirementType::Custom => true,
    }
}

fn expect_action(requirement: &Requirement, evaluator: Action) -> Result<(), ComplianceError> {
    if requirement.action() != evaluator {
        return Err(ComplianceError::ActionMismatch {
            evaluator: evaluator.to_string(),
            found: requirement.action().to_string(),
        });
    }
    Ok(())
}

/// Call and instantiation rules only support MUST, MUST_NOT and OPTIONALLY.
fn reject_composite(requirement: &Requirement) -> Result<(), ComplianceError> {
    let requirement_type = requirement.requirement_type();
    if requirement_type.is_simple() || requirement_type == RequirementType::Optionally {
        return Ok(());
    }
    Err(ComplianceError::Unsupported {
        action: requirement.action().to_string(),
        requirement_type: requirement_type.to_string(),
    })
}

fn target_of(requirement: &Requirement) -> Result<&str, ComplianceError> {
    requirement
        .target()
        .ok_or_else(|| ComplianceError::MissingTarget {
            action: requirement.action().to_string(),
        })
}

/// Fact over the student body; false when the student has no such method.
fn student_fact(
    subject: &MethodSubject<'_>,
    fact: impl FnOnce(&CallableContext<'_>) -> Result<bool, ComplianceError>,
) -> Result<bool, ComplianceError> {
    match subject.student {
        Some(ref ctx) => fact(ctx),
        None => Ok(false),
    }
}

pub(crate) fn evaluate_call(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Call)?;
    reject_composite(requirement)?;
    let target = target_of(requirement)?;
    let fact = student_fact(subject, |ctx| match requirement.target_type() {
        TargetType::Constructor => heuristics::calls_constructor_with_signature(ctx, target),
        _ => Ok(heuristics::calls_method_with_signature(ctx, target)?),
    })?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_instantiate(
    subject: &MethodSubject<'_>,
    requirement: &Requirement,
) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Instantiate)?;
    reject_composite(requirement)?;
    let target = target_of(requirement)?;
    let fact = student_fact(subject, |ctx| {
        Ok(heuristics::instantiates_class_with_signature(ctx, target)?)
    })?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_set_value(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::SetValue)?;
    let target = target_of(requirement)?;
    let fact = student_fact(subject, |ctx| Ok(statements::writes_variable(ctx, target)))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_get_value(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::GetValue)?;
    let target = target_of(requirement)?;
    let fact = student_fact(subject, |ctx| Ok(statements::reads_variable(ctx, target)))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_define(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Define)?;
    let target = target_of(requirement)?;
    let fact = student_fact(subject, |ctx| Ok(statements::defines_local(ctx, target)))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

/// The starter body declared the local and the student body no longer does.
pub(crate) fn evaluate_undefine(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Undefine)?;
    let target = target_of(requirement)?;
    let before = subject
        .starter
        .as_ref()
        .is_some_and(|ctx| statements::defines_local(ctx, target));
    let after = subject
        .student
        .as_ref()
        .is_some_and(|ctx| statements::defines_local(ctx, target));
    Ok(enforce(requirement.requirement_type(), before && !after))
}

/// ADD, DELETE, MODIFY and LEAVE_AS_IS: membership in the actual change.
pub(crate) fn evaluate_change(
    subject: &MethodSubject<'_>,
    requirement: &Requirement,
    evaluator: Action,
) -> Result<bool, ComplianceError> {
    expect_action(requirement, evaluator)?;
    let fact = subject.actual_change == Some(evaluator);
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_use(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Use)?;
    let target = target_of(requirement)?;
    let fact = student_fact(subject, |ctx| Ok(statements::uses_variable(ctx, target)))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_try(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Try)?;
    let fact = student_fact(subject, |ctx| Ok(statements::has_try(ctx)))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_try_with_resources(
    subject: &MethodSubject<'_>,
    requirement: &Requirement,
) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::TryWithResources)?;
    let fact = student_fact(subject, |ctx| Ok(statements::has_try_with_resources(ctx)))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_throw(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Throw)?;
    let fact = student_fact(subject, |ctx| Ok(statements::throws(ctx, requirement.target())))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_catch(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Catch)?;
    let fact = student_fact(subject, |ctx| Ok(statements::catches(ctx, requirement.target())))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

pub(crate) fn evaluate_finally(subject: &MethodSubject<'_>, requirement: &Requirement) -> Result<bool, ComplianceError> {
    expect_action(requirement, Action::Finally)?;
    let fact = student_fact(subject, |ctx| Ok(statements::has_finally(ctx)))?;
    Ok(enforce(requirement.requirement_type(), fact))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(actual_change: Option<Action>) -> MethodSubject<'static> {
        MethodSubject {
            signature: "clear()",
            student: None,
            starter: None,
            actual_change,
        }
    }

    #[test]
    fn test_enforce_table() {
        assert!(enforce(RequirementType::Must, true));
        assert!(!enforce(RequirementType::Must, false));
        assert!(enforce(RequirementType::MustNot, false));
        assert!(!enforce(RequirementType::Prohibits, true));
        assert!(enforce(RequirementType::Requires, true));
        assert!(enforce(RequirementType::Optionally, false));
        assert!(enforce(RequirementType::Custom, false));
    }

    #[test]
    fn test_evaluator_rejects_wrong_action() {
        let err = evaluate_call(&subject(None), &Requirement::must_modify_method()).unwrap_err();
        assert!(matches!(
            err,
            ComplianceError::ActionMismatch { ref evaluator, ref found } if evaluator == "CALL" && found == "MODIFY"
        ));
        let err = evaluate_change(&subject(None), &Requirement::must_add_method(), Action::Delete).unwrap_err();
        assert!(matches!(err, ComplianceError::ActionMismatch { .. }));
    }

    #[test]
    fn test_composite_types_unsupported_for_calls() {
        for requirement_type in [RequirementType::Requires, RequirementType::Prohibits, RequirementType::Custom] {
            let req = Requirement::new(Action::Call, requirement_type, TargetType::Method, Some("size()")).unwrap();
            let err = evaluate_requirement(&subject(Some(Action::Modify)), &req).unwrap_err();
            assert!(matches!(err, ComplianceError::Unsupported { .. }));

            let req = Requirement::new(
                Action::Instantiate,
                requirement_type,
                TargetType::Constructor,
                Some("Bag()"),
            )
            .unwrap();
            assert!(evaluate_requirement(&subject(Some(Action::Modify)), &req).is_err());
        }
    }

    #[test]
    fn test_change_membership() {
        let deleted = subject(Some(Action::Delete));
        assert!(evaluate_requirement(&deleted, &Requirement::must_delete_method()).unwrap());
        assert!(!evaluate_requirement(&deleted, &Requirement::must_modify_method()).unwrap());
        assert!(evaluate_requirement(&deleted, &Requirement::optionally_modify_method()).unwrap());

        let missing = subject(None);
        assert!(!evaluate_requirement(&missing, &Requirement::must_add_method()).unwrap());
        // No student body: calls cannot happen.
        assert!(!evaluate_requirement(&missing, &Requirement::must_call_method("size()").unwrap()).unwrap());
        assert!(evaluate_requirement(&missing, &Requirement::must_not_call_method("size()").unwrap()).unwrap());
    }
}
