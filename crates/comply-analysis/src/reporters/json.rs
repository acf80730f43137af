//! JSON reporter: structured output for grading pipelines.

use serde_json::json;

use super::Reporter;
use crate::compliance::ComplianceResult;

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, result: &ComplianceResult) -> Result<String, String> {
        let methods: Vec<serde_json::Value> = result
            .evaluations
            .iter()
            .map(|e| {
                json!({
                    "key": e.key,
                    "signature": e.signature,
                    "status": e.status,
                    "actual_change": e.actual_change,
                    "expected_change": e.expected_change,
                    "requirements": e.requirements.iter().map(|r| json!({
                        "requirement_type": r.requirement_type(),
                        "action": r.action(),
                        "target_type": r.target_type(),
                        "target": r.target(),
                        "compliance": r.compliance(),
                        "grading": r.grading(),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let output = json!({
            "class_name": result.class_name,
            "all_passed": result.all_passed(),
            "starter": result.starter,
            "student": result.student,
            "actual_changes": result.actual_changes,
            "expected_changes": result.expected_changes,
            "passed_inspection": result.passed_inspection,
            "failed_inspection": result.failed_inspection,
            "mismatches": result.mismatches.iter().map(|m| json!({
                "key": m.key,
                "expected": m.expected,
                "actual": m.actual,
            })).collect::<Vec<_>>(),
            "counters": result.counters,
            "notes": result.notes,
            "methods": methods,
        });

        serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
    }
}
