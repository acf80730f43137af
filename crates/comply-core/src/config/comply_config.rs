//! Top-level configuration with 4-layer resolution.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, AssignmentConfig, ReportConfig, ReportFormat};
use crate::errors::ConfigError;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "comply.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`COMPLY_*`)
/// 3. Project config (`comply.toml` in project root)
/// 4. User config (`~/.comply/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ComplyConfig {
    pub assignment: AssignmentConfig,
    pub analysis: AnalysisConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub class_name: Option<String>,
    pub starter_dir: Option<PathBuf>,
    pub student_dir: Option<PathBuf>,
    pub rules_file: Option<PathBuf>,
    pub report_format: Option<ReportFormat>,
}

impl ComplyConfig {
    /// Load configuration with 4-layer resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ComplyConfig) -> Result<(), ConfigError> {
        if let Some(ref name) = config.assignment.class_name {
            if !is_java_identifier(name) {
                return Err(ConfigError::ValidationFailed {
                    field: "assignment.class_name".to_string(),
                    message: format!("'{name}' is not a Java identifier"),
                });
            }
        }
        if let Some(ref ext) = config.assignment.source_extension {
            if ext.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "assignment.source_extension".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(indent) = config.report.indent {
            if indent > ReportConfig::MAX_INDENT {
                return Err(ConfigError::ValidationFailed {
                    field: "report.indent".to_string(),
                    message: format!("must be at most {}", ReportConfig::MAX_INDENT),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.comply/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ComplyConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let file_config: ComplyConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut ComplyConfig, other: &ComplyConfig) {
        // Assignment
        if other.assignment.class_name.is_some() {
            base.assignment.class_name = other.assignment.class_name.clone();
        }
        if other.assignment.starter_dir.is_some() {
            base.assignment.starter_dir = other.assignment.starter_dir.clone();
        }
        if other.assignment.student_dir.is_some() {
            base.assignment.student_dir = other.assignment.student_dir.clone();
        }
        if other.assignment.source_extension.is_some() {
            base.assignment.source_extension = other.assignment.source_extension.clone();
        }
        if !other.assignment.support_dirs.is_empty() {
            base.assignment.support_dirs = other.assignment.support_dirs.clone();
        }
        if other.assignment.rules_file.is_some() {
            base.assignment.rules_file = other.assignment.rules_file.clone();
        }

        // Analysis
        if other.analysis.resolve_external_calls.is_some() {
            base.analysis.resolve_external_calls = other.analysis.resolve_external_calls;
        }
        if other.analysis.strip_comments.is_some() {
            base.analysis.strip_comments = other.analysis.strip_comments;
        }
        if other.analysis.include_nested_types.is_some() {
            base.analysis.include_nested_types = other.analysis.include_nested_types;
        }

        // Report
        if other.report.include_compliance.is_some() {
            base.report.include_compliance = other.report.include_compliance;
        }
        if other.report.indent.is_some() {
            base.report.indent = other.report.indent;
        }
        if other.report.format.is_some() {
            base.report.format = other.report.format;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `COMPLY_ASSIGNMENT_CLASS_NAME`, `COMPLY_REPORT_FORMAT`, etc.
    fn apply_env_overrides(config: &mut ComplyConfig) {
        if let Ok(val) = std::env::var("COMPLY_ASSIGNMENT_CLASS_NAME") {
            config.assignment.class_name = Some(val);
        }
        if let Ok(val) = std::env::var("COMPLY_ASSIGNMENT_STARTER_DIR") {
            config.assignment.starter_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("COMPLY_ASSIGNMENT_STUDENT_DIR") {
            config.assignment.student_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("COMPLY_ANALYSIS_RESOLVE_EXTERNAL_CALLS") {
            if let Ok(v) = val.parse::<bool>() {
                config.analysis.resolve_external_calls = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COMPLY_REPORT_FORMAT") {
            if let Ok(v) = val.parse::<ReportFormat>() {
                config.report.format = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COMPLY_REPORT_INCLUDE_COMPLIANCE") {
            if let Ok(v) = val.parse::<bool>() {
                config.report.include_compliance = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ComplyConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.class_name {
            config.assignment.class_name = Some(v.clone());
        }
        if let Some(ref v) = cli.starter_dir {
            config.assignment.starter_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.student_dir {
            config.assignment.student_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.rules_file {
            config.assignment.rules_file = Some(v.clone());
        }
        if let Some(v) = cli.report_format {
            config.report.format = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn is_java_identifier(name: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex is valid"))
        .is_match(name)
}

/// Returns the user-level config directory: `~/.comply/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".comply"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
