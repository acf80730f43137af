//! Report configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Output format of the compliance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                field: "report.format".to_string(),
                message: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Controls how requirements and results are rendered.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Append each requirement's verdict when rendering it. Default: true.
    pub include_compliance: Option<bool>,
    /// Spaces per indentation level. Default: 2.
    pub indent: Option<usize>,
    /// Output format. Default: text.
    pub format: Option<ReportFormat>,
}

impl ReportConfig {
    pub const MAX_INDENT: usize = 16;

    pub fn effective_include_compliance(&self) -> bool {
        self.include_compliance.unwrap_or(true)
    }

    pub fn effective_indent(&self) -> usize {
        self.indent.unwrap_or(2)
    }

    pub fn effective_format(&self) -> ReportFormat {
        self.format.unwrap_or_default()
    }
}
