//! Text and JSON reports for a fixture run.

use std::path::PathBuf;

use comply_analysis::compliance::ImplementationComplianceChecker;
use comply_analysis::reporters::{available_formats, create_reporter, reporter_for};
use comply_analysis::requirements::{FormatOptions, Requirement};
use comply_core::config::ReportFormat;

fn run() -> comply_analysis::ComplianceResult {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/java");
    let mut checker = ImplementationComplianceChecker::new(
        root.join("starter/LinkedBag.java"),
        root.join("student/LinkedBag.java"),
        "LinkedBag",
    );
    checker.add_support_file(root.join("support/BagInterface.java"));
    checker.set_method_requirements("add(T)", [Requirement::do_leave_everything_as_is()]);
    checker.set_method_requirements(
        "union(BagInterface<T>)",
        [Requirement::must_instantiate("LinkedBag(BagInterface)").unwrap()],
    );
    checker.analyze().unwrap()
}

#[test]
fn test_text_report_sections() {
    let result = run();
    let report = create_reporter("text", FormatOptions::default())
        .unwrap()
        .generate(&result)
        .unwrap();

    assert!(report.starts_with("Implementation compliance report for LinkedBag"));
    assert!(report.contains("Added methods:"));
    assert!(report.contains("LinkedBag::method::helper()"));
    assert!(report.contains("Deleted methods:"));
    assert!(report.contains("LinkedBag::method::contains(T)"));
    assert!(report.contains("union(BagInterface<T>) [FAILED]"));
    assert!(report.contains("MUST INSTANTIATE CONSTRUCTOR LinkedBag(BagInterface) [FAILED]"));
    assert!(report.contains("unchanged from starter code, not checked"));
    assert!(report.contains("Summary:"));
}

#[test]
fn test_json_report_structure() {
    let result = run();
    let report = reporter_for(ReportFormat::Json, FormatOptions::default())
        .generate(&result)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();

    assert_eq!(value["class_name"], "LinkedBag");
    assert_eq!(value["all_passed"], false);
    assert_eq!(value["failed_inspection"][0], "union(BagInterface<T>)");
    assert_eq!(value["counters"]["methods_failed"], 1);

    let methods = value["methods"].as_array().unwrap();
    let union = methods
        .iter()
        .find(|m| m["signature"] == "union(BagInterface<T>)")
        .unwrap();
    assert_eq!(union["key"], "LinkedBag::method::union(BagInterface<T>)");
    assert_eq!(union["actual_change"], "MODIFY");
    assert_eq!(union["requirements"][0]["compliance"], "FAILED");
}

#[test]
fn test_unknown_format_has_no_reporter() {
    assert!(create_reporter("xml", FormatOptions::default()).is_none());
    assert_eq!(available_formats(), &["text", "json"]);
}
