//! Expected and actual change classification.

use std::collections::BTreeMap;

use crate::methods::{MethodKey, MethodMap};
use crate::requirements::{Action, Requirement, RequirementType};

/// What happened to `key` between the starter and the student source.
///
/// Returns `None` when neither source declares it.
pub fn actual_change(key: &MethodKey, starter: &MethodMap, student: &MethodMap) -> Option<Action> {
    match (starter.get(key), student.get(key)) {
        (Some(before), Some(after)) if before.body_text == after.body_text => Some(Action::LeaveAsIs),
        (Some(_), Some(_)) => Some(Action::Modify),
        (Some(_), None) => Some(Action::Delete),
        (None, Some(_)) => Some(Action::Add),
        (None, None) => None,
    }
}

/// Bucket every key of both inventories by its actual change.
pub fn classify_actual(starter: &MethodMap, student: &MethodMap) -> BTreeMap<Action, Vec<MethodKey>> {
    let mut buckets: BTreeMap<Action, Vec<MethodKey>> = BTreeMap::new();
    for key in starter.keys().chain(student.keys().filter(|k| !starter.contains_key(*k))) {
        if let Some(action) = actual_change(key, starter, student) {
            tracing::debug!(key = %key, change = %action, "classified method");
            buckets.entry(action).or_default().push(key.clone());
        }
    }
    buckets
}

/// The change a method's requirements ask for.
///
/// Only the first requirement that is neither optional, negative, nor
/// leave-as-is decides; without one the method is expected to stay as is.
pub fn expected_change(requirements: &[Requirement]) -> Action {
    requirements
        .iter()
        .find(|r| {
            let requirement_type = r.requirement_type();
            requirement_type != RequirementType::Optionally
                && !requirement_type.is_negative()
                && !r.behavior().is_leave_as_is()
        })
        .map(|r| r.action().expected_change())
        .unwrap_or(Action::LeaveAsIs)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::methods::{collect_methods, InventoryOptions};
    use crate::parsers::JavaParser;

    fn inventory(src: &str) -> MethodMap {
        let mut parser = JavaParser::new().unwrap();
        let unit = parser.parse(src.to_string(), Path::new("Bag.java")).unwrap();
        let decl = unit.find_type("Bag").unwrap();
        collect_methods(&unit, &decl, InventoryOptions::default())
    }

    #[test]
    fn test_classifies_all_four_buckets() {
        let starter = inventory(
            "class Bag { int size() { return 0; } void clear() {} boolean isEmpty() { return true; } }",
        );
        let student = inventory(
            "class Bag {\n  // same tokens\n  int size() {\n    return 0;\n  }\n  void clear() { size(); }\n  void helper() {}\n}",
        );
        let buckets = classify_actual(&starter, &student);
        let names = |a: Action| -> Vec<String> {
            buckets
                .get(&a)
                .map(|keys| keys.iter().map(|k| k.signature().to_string()).collect())
                .unwrap_or_default()
        };
        assert_eq!(names(Action::LeaveAsIs), vec!["size()"]);
        assert_eq!(names(Action::Modify), vec!["clear()"]);
        assert_eq!(names(Action::Delete), vec!["isEmpty()"]);
        assert_eq!(names(Action::Add), vec!["helper()"]);
    }

    #[test]
    fn test_string_literal_whitespace_edit_is_a_modification() {
        let starter = inventory(
            r#"class Bag { String sep() { return " "; } String greet() { return "Hello "; } String same() { return " a "; } }"#,
        );
        let student = inventory(
            r#"class Bag { String sep() { return ""; } String greet() { return "Hello"; } String same() {
                return " a ";
            } }"#,
        );
        let buckets = classify_actual(&starter, &student);
        let modified: Vec<&str> = buckets[&Action::Modify].iter().map(|k| k.signature()).collect();
        assert_eq!(modified, vec!["greet()", "sep()"]);
        let unchanged: Vec<&str> = buckets[&Action::LeaveAsIs].iter().map(|k| k.signature()).collect();
        assert_eq!(unchanged, vec!["same()"]);
    }

    #[test]
    fn test_expected_change_uses_first_qualifying_requirement() {
        let reqs = vec![
            Requirement::do_leave_everything_as_is(),
            Requirement::must_not_call_method("clear()").unwrap(),
            Requirement::optionally_modify_method(),
            Requirement::must_call_method("size()").unwrap(),
            Requirement::must_delete_method(),
        ];
        assert_eq!(expected_change(&reqs), Action::Modify);
        assert_eq!(expected_change(&[Requirement::must_add_method()]), Action::Add);
        assert_eq!(expected_change(&[Requirement::do_not_modify_method()]), Action::LeaveAsIs);
        assert_eq!(expected_change(&[]), Action::LeaveAsIs);
    }
}
