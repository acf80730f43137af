//! The aggregate outcome of one compliance run and its text rendering.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use comply_core::errors::SourceCategory;

use crate::methods::{MethodKey, MethodMap};
use crate::requirements::{Action, Compliance, FormatOptions, Requirement};

/// Change buckets in report order.
pub const CHANGE_ACTIONS: [Action; 4] = [Action::Add, Action::Delete, Action::Modify, Action::LeaveAsIs];

/// One parsed input file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub category: SourceCategory,
    pub path: PathBuf,
    pub parse_error_count: u32,
    #[serde(skip)]
    pub source: String,
}

/// How a method came out of evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Passed,
    Failed,
    /// Unchanged from the starter code, so not evaluated.
    NotChecked,
    /// No requirements were configured for the signature.
    Unconfigured,
    /// Explicitly configured with no requirements.
    Exempt,
}

impl EvaluationStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::NotChecked => "NOT_CHECKED",
            Self::Unconfigured => "UNCONFIGURED",
            Self::Exempt => "EXEMPT",
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluation of every requirement configured for one method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodEvaluation {
    pub key: MethodKey,
    pub signature: String,
    /// `None` when the method is in neither source.
    pub actual_change: Option<Action>,
    /// `None` when the method has no requirements.
    pub expected_change: Option<Action>,
    pub status: EvaluationStatus,
    /// Requirements with their verdicts.
    pub requirements: Vec<Requirement>,
}

impl MethodEvaluation {
    pub fn compliance(&self) -> Compliance {
        match self.status {
            EvaluationStatus::Passed => Compliance::Passed,
            EvaluationStatus::Failed => Compliance::Failed,
            EvaluationStatus::NotChecked => Compliance::NotChecked,
            EvaluationStatus::Unconfigured | EvaluationStatus::Exempt => Compliance::Unknown,
        }
    }
}

/// A method whose actual change differs from the expected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeMismatch {
    pub key: MethodKey,
    pub expected: Action,
    pub actual: Option<Action>,
}

impl fmt::Display for ChangeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actual = self.actual.map(|a| a.name()).unwrap_or("MISSING");
        write!(f, "{}: expected {}, found {}", self.key.signature(), self.expected, actual)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceCounters {
    pub methods_evaluated: usize,
    pub methods_passed: usize,
    pub methods_failed: usize,
    pub methods_not_checked: usize,
    pub methods_unconfigured: usize,
    pub methods_exempt: usize,
    pub requirements_checked: usize,
    pub requirements_passed: usize,
    pub requirements_failed: usize,
}

/// Everything one `analyze()` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceResult {
    pub class_name: String,
    pub starter: SourceInfo,
    pub student: SourceInfo,
    pub starter_methods: MethodMap,
    pub student_methods: MethodMap,
    pub expected_changes: BTreeMap<Action, Vec<MethodKey>>,
    pub actual_changes: BTreeMap<Action, Vec<MethodKey>>,
    pub evaluations: Vec<MethodEvaluation>,
    /// Signatures of methods whose requirements all passed.
    pub passed_inspection: Vec<String>,
    /// Signatures of methods with at least one failed requirement.
    pub failed_inspection: Vec<String>,
    pub mismatches: Vec<ChangeMismatch>,
    pub counters: ComplianceCounters,
    pub notes: Vec<String>,
}

impl ComplianceResult {
    pub fn evaluation(&self, signature: &str) -> Option<&MethodEvaluation> {
        self.evaluations.iter().find(|e| e.signature == signature)
    }

    /// Keys in the given actual change bucket.
    pub fn changed(&self, action: Action) -> &[MethodKey] {
        self.actual_changes.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_passed(&self) -> bool {
        self.failed_inspection.is_empty()
    }

    /// Plain-text report.
    pub fn render(&self, options: &FormatOptions) -> String {
        let mut out = String::new();
        let pad1 = options.pad(1);
        let pad2 = options.pad(2);

        let _ = writeln!(out, "Implementation compliance report for {}", self.class_name);
        for info in [&self.starter, &self.student] {
            let _ = write!(out, "{pad1}{}: {}", info.category, info.path.display());
            if info.parse_error_count > 0 {
                let _ = write!(out, " ({} syntax errors)", info.parse_error_count);
            }
            out.push('\n');
        }

        for action in CHANGE_ACTIONS {
            let Some(heading) = change_heading(action) else {
                continue;
            };
            let _ = writeln!(out, "\n{heading} methods:");
            let keys = self.changed(action);
            if keys.is_empty() {
                let _ = writeln!(out, "{pad1}(none)");
            }
            for key in keys {
                let _ = writeln!(out, "{pad1}{key}");
            }
        }

        out.push_str("\nRequirements:\n");
        for eval in &self.evaluations {
            let _ = writeln!(out, "{pad1}{} [{}]", eval.signature, eval.status);
            match eval.status {
                EvaluationStatus::NotChecked => {
                    let _ = writeln!(out, "{pad2}unchanged from starter code, not checked");
                }
                EvaluationStatus::Unconfigured | EvaluationStatus::Exempt => {
                    let _ = writeln!(out, "{pad2}no implementation compliance rules available");
                }
                EvaluationStatus::Passed | EvaluationStatus::Failed => {
                    for requirement in &eval.requirements {
                        let _ = writeln!(out, "{pad2}{}", requirement.render(options));
                    }
                }
            }
        }

        if !self.mismatches.is_empty() {
            out.push_str("\nExpectation mismatches:\n");
            for mismatch in &self.mismatches {
                let _ = writeln!(out, "{pad1}{mismatch}");
            }
        }

        if !self.notes.is_empty() {
            out.push_str("\nNotes:\n");
            for note in &self.notes {
                let _ = writeln!(out, "{pad1}{note}");
            }
        }

        let c = &self.counters;
        out.push_str("\nSummary:\n");
        let _ = writeln!(
            out,
            "{pad1}methods evaluated: {}, passed: {}, failed: {}, not checked: {}, unconfigured: {}, exempt: {}",
            c.methods_evaluated,
            c.methods_passed,
            c.methods_failed,
            c.methods_not_checked,
            c.methods_unconfigured,
            c.methods_exempt,
        );
        let _ = writeln!(
            out,
            "{pad1}requirements checked: {}, passed: {}, failed: {}",
            c.requirements_checked, c.requirements_passed, c.requirements_failed,
        );
        out
    }
}

/// Report heading of a change bucket; `None` for actions that are not one.
fn change_heading(action: Action) -> Option<&'static str> {
    match action {
        Action::Add => Some("Added"),
        Action::Delete => Some("Deleted"),
        Action::Modify => Some("Modified"),
        Action::LeaveAsIs => Some("Unchanged"),
        Action::Call
        | Action::Instantiate
        | Action::SetValue
        | Action::GetValue
        | Action::Define
        | Action::Undefine
        | Action::Use
        | Action::Try
        | Action::TryWithResources
        | Action::Throw
        | Action::Catch
        | Action::Finally => None,
    }
}

impl fmt::Display for ComplianceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&FormatOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_change_bucket_has_its_own_heading() {
        let headings: Vec<&str> = CHANGE_ACTIONS.iter().filter_map(|a| change_heading(*a)).collect();
        assert_eq!(headings, vec!["Added", "Deleted", "Modified", "Unchanged"]);
        let others = Action::ALL.iter().filter(|a| !CHANGE_ACTIONS.contains(a));
        for action in others {
            assert_eq!(change_heading(*action), None, "{action}");
        }
    }
}
