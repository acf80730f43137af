//! Rendering options for requirements and reports.

use comply_core::config::ReportConfig;

/// Explicit formatting context, passed to every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Append `[VERDICT]` to rendered requirements.
    pub include_compliance: bool,
    /// Spaces per indentation level.
    pub indent: usize,
}

impl FormatOptions {
    pub fn new(include_compliance: bool, indent: usize) -> Self {
        Self {
            include_compliance,
            indent,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(
            config.effective_include_compliance(),
            config.effective_indent(),
        )
    }

    /// Indentation string for `level` nesting levels.
    pub fn pad(&self, level: usize) -> String {
        " ".repeat(self.indent * level)
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new(true, 2)
    }
}
