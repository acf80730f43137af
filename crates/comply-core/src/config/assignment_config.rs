//! Per-assignment configuration: which class is graded and where its sources live.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Everything that identifies the assignment under analysis.
///
/// Threaded explicitly into the checker so that concurrent runs over
/// different submissions never share state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Simple name of the class whose methods are inventoried, e.g. `LinkedBag`.
    pub class_name: Option<String>,
    /// Directory searched for the starter source.
    pub starter_dir: Option<PathBuf>,
    /// Directory searched for the student source.
    pub student_dir: Option<PathBuf>,
    /// Source file extension. Default: `java`.
    pub source_extension: Option<String>,
    /// Extra directories whose sources feed symbol resolution (interfaces, helpers).
    #[serde(default)]
    pub support_dirs: Vec<PathBuf>,
    /// Optional TOML file with `[[rules]]` entries.
    pub rules_file: Option<PathBuf>,
}

impl AssignmentConfig {
    /// Returns the effective source extension, defaulting to `java`.
    pub fn effective_source_extension(&self) -> &str {
        self.source_extension.as_deref().unwrap_or("java")
    }

    /// File name the locator searches for, e.g. `LinkedBag.java`.
    pub fn source_file_name(&self) -> Option<String> {
        self.class_name
            .as_ref()
            .map(|name| format!("{}.{}", name, self.effective_source_extension()))
    }
}
