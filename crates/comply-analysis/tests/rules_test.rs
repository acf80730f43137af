//! Rule files: parsing, validation, and their effect on a checker.

use comply_analysis::compliance::{EvaluationStatus, ImplementationComplianceChecker};
use comply_analysis::requirements::{Action, RequirementType, RuleSet, TargetType};
use comply_core::errors::RuleError;

const RULES: &str = r#"
no_requirements = ["toString()"]

[[rules]]
signature = "union(BagInterface<T> anotherBag)"
requirement_type = "MUST"
action = "INSTANTIATE"
target_type = "CONSTRUCTOR"
target = "LinkedBag(BagInterface)"
grading = { points = 5 }

[[rules]]
signature = "add(T)"
requirement_type = "MUST"
action = "LEAVE_AS_IS"

[[rules]]
signature = "add(T)"
requirement_type = "MUST"
action = "CALL"
target = "validate(T)"
enabled = false
"#;

#[test]
fn test_rule_file_compiles_enabled_rules() {
    let set = RuleSet::load_from_str(RULES).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.no_requirements, vec!["toString()".to_string()]);

    let union = &set.rules[0];
    assert_eq!(union.signature, "union(BagInterface<T>)");
    assert_eq!(union.requirement.action(), Action::Instantiate);
    assert_eq!(union.requirement.requirement_type(), RequirementType::Must);
    assert_eq!(union.requirement.target_type(), TargetType::Constructor);
    assert_eq!(union.requirement.target(), Some("LinkedBag(BagInterface)"));
    assert!(union.requirement.grading().contains_key("points"));

    assert_eq!(set.rules[1].requirement.target_type(), TargetType::Method);
}

#[test]
fn test_rule_file_rejects_bad_rules() {
    let unknown_action = r#"
[[rules]]
signature = "add(T)"
requirement_type = "MUST"
action = "REWRITE"
"#;
    assert!(matches!(
        RuleSet::load_from_str(unknown_action),
        Err(RuleError::UnknownAction(_))
    ));

    let missing_target = r#"
[[rules]]
signature = "add(T)"
requirement_type = "MUST"
action = "CALL"
"#;
    assert!(matches!(
        RuleSet::load_from_str(missing_target),
        Err(RuleError::MissingTarget { .. })
    ));

    let malformed = "[[rules]]\nsignature = ";
    assert!(matches!(
        RuleSet::load_from_str(malformed),
        Err(RuleError::ParseError { .. })
    ));
}

#[test]
fn test_missing_rule_file_is_parse_error() {
    let err = RuleSet::load_from_file(std::path::Path::new("/nonexistent/rules.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/rules.toml"));
}

#[test]
fn test_rules_append_to_programmatic_requirements() {
    let starter = "public class Box { public int size() { return 0; } public String toString() { return \"\"; } }";
    let student = "public class Box { public int size() { return 1; } public String toString() { return \"box\"; } }";

    let mut checker = ImplementationComplianceChecker::from_sources("Box", starter, student);
    checker.set_method_requirements(
        "size()",
        [comply_analysis::Requirement::must_modify_method()],
    );
    let rules = RuleSet::load_from_str(
        r#"
no_requirements = ["toString()"]

[[rules]]
signature = "size()"
requirement_type = "MUST_NOT"
action = "THROW"
"#,
    )
    .unwrap();
    checker.apply_rules(&rules);
    assert_eq!(checker.requirements_for("size()").unwrap().len(), 2);

    let result = checker.analyze().unwrap();
    assert_eq!(result.evaluation("size()").unwrap().status, EvaluationStatus::Passed);
    assert_eq!(result.evaluation("toString()").unwrap().status, EvaluationStatus::Exempt);
    assert_eq!(result.counters.methods_exempt, 1);
    assert!(result.notes.is_empty());
}
