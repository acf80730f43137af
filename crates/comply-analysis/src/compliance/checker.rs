//! ImplementationComplianceChecker: diffs a student's class against the
//! starter code and evaluates the configured requirements per method.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use comply_core::config::ComplyConfig;
use comply_core::errors::{ComplianceError, ConfigError, SourceCategory};

use super::classify::{actual_change, classify_actual, expected_change};
use super::evaluate::{evaluate_requirement, MethodSubject};
use super::result::{
    ChangeMismatch, ComplianceCounters, ComplianceResult, EvaluationStatus, MethodEvaluation, SourceInfo,
};
use crate::heuristics::{CallableContext, SymbolTable};
use crate::locator::SourceLocator;
use crate::methods::signature::canonical_signature;
use crate::methods::{collect_methods, InventoryOptions, MethodInfo, MethodKey};
use crate::parsers::{CompilationUnit, JavaParser, TypeDecl};
use crate::requirements::{Action, Compliance, FormatOptions, Requirement, RuleSet};

/// Analysis switches for one checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckerOptions {
    pub inventory: InventoryOptions,
    /// Synthesize signatures for calls into code outside the known sources.
    pub resolve_external_calls: bool,
    pub format: FormatOptions,
}

impl CheckerOptions {
    pub fn from_config(config: &ComplyConfig) -> Self {
        Self {
            inventory: InventoryOptions::from_config(&config.analysis),
            resolve_external_calls: config.analysis.effective_resolve_external_calls(),
            format: FormatOptions::from_config(&config.report),
        }
    }
}

#[derive(Debug, Clone)]
enum SourceInput {
    File(PathBuf),
    Text { path: PathBuf, source: String },
}

impl SourceInput {
    fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Text { path, .. } => path,
        }
    }

    fn load(&self, parser: &mut JavaParser, category: SourceCategory) -> Result<CompilationUnit, ComplianceError> {
        match self {
            Self::File(path) => {
                if !path.is_file() {
                    return Err(ComplianceError::SourceNotFound {
                        category,
                        path: path.clone(),
                    });
                }
                Ok(parser.parse_file(path)?)
            }
            Self::Text { path, source } => Ok(parser.parse(source.clone(), path)?),
        }
    }
}

/// Owns the inputs and rules of one assignment. Each `analyze()` call is
/// an independent run producing its own `ComplianceResult`.
#[derive(Debug, Clone)]
pub struct ImplementationComplianceChecker {
    class_name: String,
    starter: SourceInput,
    student: SourceInput,
    support: Vec<SourceInput>,
    options: CheckerOptions,
    /// Canonical signature to its requirements. An empty list marks a
    /// method deliberately left without rules.
    requirements: BTreeMap<String, Vec<Requirement>>,
}

impl ImplementationComplianceChecker {
    /// Checker over explicit file paths. Missing files surface from `analyze()`.
    pub fn new(starter_path: impl Into<PathBuf>, student_path: impl Into<PathBuf>, class_name: &str) -> Self {
        Self::with_inputs(
            SourceInput::File(starter_path.into()),
            SourceInput::File(student_path.into()),
            class_name,
        )
    }

    /// Checker over in-memory sources.
    pub fn from_sources(class_name: &str, starter_source: &str, student_source: &str) -> Self {
        let file_name = format!("{class_name}.java");
        Self::with_inputs(
            SourceInput::Text {
                path: Path::new("starter").join(&file_name),
                source: starter_source.to_string(),
            },
            SourceInput::Text {
                path: Path::new("student").join(&file_name),
                source: student_source.to_string(),
            },
            class_name,
        )
    }

    /// Locate both sources, the support sources and the rule file from
    /// an assignment configuration.
    pub fn from_config(config: &ComplyConfig) -> Result<Self, ComplianceError> {
        let assignment = &config.assignment;
        let class_name = assignment
            .class_name
            .as_deref()
            .ok_or_else(|| required("assignment.class_name"))?;
        let starter_dir = assignment
            .starter_dir
            .as_deref()
            .ok_or_else(|| required("assignment.starter_dir"))?;
        let student_dir = assignment
            .student_dir
            .as_deref()
            .ok_or_else(|| required("assignment.student_dir"))?;

        let locator = SourceLocator::new(assignment.effective_source_extension());
        let starter = locator.locate(starter_dir, class_name, SourceCategory::Starter)?;
        let student = locator.locate(student_dir, class_name, SourceCategory::Student)?;

        let mut checker = Self::new(starter, student, class_name).with_options(CheckerOptions::from_config(config));
        for dir in &assignment.support_dirs {
            for path in locator.all_sources(dir) {
                checker.add_support_file(path);
            }
        }
        if let Some(rules_file) = &assignment.rules_file {
            let rules = RuleSet::load_from_file(rules_file)?;
            checker.apply_rules(&rules);
        }
        Ok(checker)
    }

    fn with_inputs(starter: SourceInput, student: SourceInput, class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            starter,
            student,
            support: Vec::new(),
            options: CheckerOptions::default(),
            requirements: BTreeMap::new(),
        }
    }

    pub fn with_options(mut self, options: CheckerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// A source whose declarations feed call resolution only.
    pub fn add_support_file(&mut self, path: impl Into<PathBuf>) {
        self.support.push(SourceInput::File(path.into()));
    }

    pub fn add_support_source(&mut self, path: impl Into<PathBuf>, source: &str) {
        self.support.push(SourceInput::Text {
            path: path.into(),
            source: source.to_string(),
        });
    }

    /// Replace the requirements of the method with `signature`.
    pub fn set_method_requirements(
        &mut self,
        signature: &str,
        requirements: impl IntoIterator<Item = Requirement>,
    ) {
        self.requirements
            .insert(canonical_signature(signature), requirements.into_iter().collect());
    }

    /// Mark the method as deliberately having no requirements.
    pub fn set_method_no_requirements(&mut self, signature: &str) {
        self.requirements.insert(canonical_signature(signature), Vec::new());
    }

    /// Append the rules of a rule file, in file order.
    pub fn apply_rules(&mut self, rules: &RuleSet) {
        for entry in &rules.rules {
            self.requirements
                .entry(entry.signature.clone())
                .or_default()
                .push(entry.requirement.clone());
        }
        for signature in &rules.no_requirements {
            self.requirements.entry(signature.clone()).or_default();
        }
    }

    pub fn requirements_for(&self, signature: &str) -> Option<&[Requirement]> {
        self.requirements
            .get(&canonical_signature(signature))
            .map(Vec::as_slice)
    }

    /// Run one full analysis: parse, inventory, classify, evaluate.
    pub fn analyze(&mut self) -> Result<ComplianceResult, ComplianceError> {
        let started = Instant::now();
        tracing::info!(
            class = %self.class_name,
            starter = %self.starter.path().display(),
            student = %self.student.path().display(),
            "starting compliance analysis"
        );

        let mut parser = JavaParser::new()?;
        let starter_unit = self.starter.load(&mut parser, SourceCategory::Starter)?;
        let student_unit = self.student.load(&mut parser, SourceCategory::Student)?;
        let mut support_units = Vec::with_capacity(self.support.len());
        for input in &self.support {
            support_units.push(input.load(&mut parser, SourceCategory::Support)?);
        }

        let starter_decl = find_class(&starter_unit, &self.class_name, SourceCategory::Starter)?;
        let student_decl = find_class(&student_unit, &self.class_name, SourceCategory::Student)?;
        let mut starter_methods = collect_methods(&starter_unit, &starter_decl, self.options.inventory);
        let mut student_methods = collect_methods(&student_unit, &student_decl, self.options.inventory);

        let symbols = SymbolTable::from_units(std::iter::once(&student_unit).chain(support_units.iter()));
        let actual_changes = classify_actual(&starter_methods, &student_methods);

        let mut configured: BTreeMap<MethodKey, &str> = BTreeMap::new();
        let mut expected_changes: BTreeMap<Action, Vec<MethodKey>> = BTreeMap::new();
        for (signature, requirements) in &self.requirements {
            let key = MethodKey::from_signature(&self.class_name, signature)?;
            if !requirements.is_empty() {
                expected_changes
                    .entry(expected_change(requirements))
                    .or_default()
                    .push(key.clone());
            }
            configured.insert(key, signature.as_str());
        }

        let mut evaluated: BTreeSet<MethodKey> = student_methods.keys().cloned().collect();
        evaluated.extend(actual_changes.get(&Action::Delete).into_iter().flatten().cloned());
        evaluated.extend(configured.keys().cloned());

        let mut counters = ComplianceCounters::default();
        let mut evaluations = Vec::with_capacity(evaluated.len());
        let mut passed_inspection = Vec::new();
        let mut failed_inspection = Vec::new();
        let mut notes = Vec::new();

        for key in &evaluated {
            counters.methods_evaluated += 1;
            let actual = actual_change(key, &starter_methods, &student_methods);
            let signature = configured
                .get(key)
                .map(|s| s.to_string())
                .unwrap_or_else(|| key.signature().to_string());
            let requirements = configured.get(key).and_then(|s| self.requirements.get(*s));
            let expected = requirements
                .filter(|r| !r.is_empty())
                .map(|r| expected_change(r));
            let mut verdicts: Vec<Requirement> = requirements.cloned().unwrap_or_default();

            let status = if actual == Some(Action::LeaveAsIs) {
                for requirement in &mut verdicts {
                    requirement.set_compliance(Compliance::NotChecked);
                }
                counters.methods_not_checked += 1;
                tracing::debug!(key = %key, "unchanged from starter, not checked");
                EvaluationStatus::NotChecked
            } else if requirements.is_none() {
                tracing::warn!(key = %key, "no implementation compliance rules available");
                notes.push(format!("{signature}: no implementation compliance rules available"));
                counters.methods_unconfigured += 1;
                EvaluationStatus::Unconfigured
            } else if verdicts.is_empty() {
                counters.methods_exempt += 1;
                EvaluationStatus::Exempt
            } else {
                let subject = MethodSubject {
                    signature: &signature,
                    student: callable_context(
                        &student_unit,
                        student_methods.get(key),
                        &symbols,
                        self.options.resolve_external_calls,
                    ),
                    starter: callable_context(
                        &starter_unit,
                        starter_methods.get(key),
                        &symbols,
                        self.options.resolve_external_calls,
                    ),
                    actual_change: actual,
                };

                let mut all_passed = true;
                for requirement in &mut verdicts {
                    let passed = evaluate_requirement(&subject, requirement)?;
                    requirement.set_compliance(Compliance::from_passed(passed));
                    counters.requirements_checked += 1;
                    if passed {
                        counters.requirements_passed += 1;
                    } else {
                        counters.requirements_failed += 1;
                        all_passed = false;
                    }
                }
                if all_passed {
                    counters.methods_passed += 1;
                    passed_inspection.push(signature.clone());
                    EvaluationStatus::Passed
                } else {
                    counters.methods_failed += 1;
                    failed_inspection.push(signature.clone());
                    EvaluationStatus::Failed
                }
            };

            tracing::debug!(key = %key, status = %status, actual = ?actual, expected = ?expected, "evaluated method");
            evaluations.push(MethodEvaluation {
                key: key.clone(),
                signature,
                actual_change: actual,
                expected_change: expected,
                status,
                requirements: verdicts,
            });
        }

        for eval in &evaluations {
            let compliance = eval.compliance();
            if let Some(info) = student_methods.get_mut(&eval.key) {
                info.set_compliance(compliance);
            } else if let Some(info) = starter_methods.get_mut(&eval.key) {
                info.set_compliance(compliance);
            }
            if eval.requirements.is_empty() {
                continue;
            }
            if let Some(stored) = self.requirements.get_mut(eval.signature.as_str()) {
                stored.clone_from(&eval.requirements);
            }
        }

        let mismatches: Vec<ChangeMismatch> = evaluations
            .iter()
            .filter_map(|eval| {
                let expected = eval.expected_change?;
                (eval.actual_change != Some(expected)).then(|| ChangeMismatch {
                    key: eval.key.clone(),
                    expected,
                    actual: eval.actual_change,
                })
            })
            .collect();

        tracing::info!(
            class = %self.class_name,
            methods_evaluated = counters.methods_evaluated,
            methods_passed = counters.methods_passed,
            methods_failed = counters.methods_failed,
            methods_not_checked = counters.methods_not_checked,
            requirements_checked = counters.requirements_checked,
            duration_ms = started.elapsed().as_millis() as u64,
            "compliance analysis finished"
        );

        Ok(ComplianceResult {
            class_name: self.class_name.clone(),
            starter: source_info(&starter_unit, SourceCategory::Starter),
            student: source_info(&student_unit, SourceCategory::Student),
            starter_methods,
            student_methods,
            expected_changes,
            actual_changes,
            evaluations,
            passed_inspection,
            failed_inspection,
            mismatches,
            counters,
            notes,
        })
    }
}

fn required(field: &str) -> ComplianceError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: "required to locate sources".to_string(),
    }
    .into()
}

fn find_class<'u>(
    unit: &'u CompilationUnit,
    class_name: &str,
    category: SourceCategory,
) -> Result<TypeDecl<'u>, ComplianceError> {
    unit.find_type(class_name)
        .ok_or_else(|| ComplianceError::ClassNotFound {
            category,
            class_name: class_name.to_string(),
        })
}

fn callable_context<'a>(
    unit: &'a CompilationUnit,
    info: Option<&'a MethodInfo>,
    symbols: &'a SymbolTable,
    resolve_external_calls: bool,
) -> Option<CallableContext<'a>> {
    let info = info?;
    let Some(node) = unit.node_for(&info.handle) else {
        tracing::warn!(path = %unit.path.display(), signature = %info.signature, "lost declaration node");
        return None;
    };
    Some(CallableContext::new(unit, node, &info.class_name, symbols).with_external_calls(resolve_external_calls))
}

fn source_info(unit: &CompilationUnit, category: SourceCategory) -> SourceInfo {
    SourceInfo {
        category,
        path: unit.path.clone(),
        parse_error_count: unit.error_count,
        source: unit.source().to_string(),
    }
}
