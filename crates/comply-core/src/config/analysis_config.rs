//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Knobs for parsing, inventory, and symbol resolution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Resolve calls with no known declaration from the call site alone. Default: false.
    pub resolve_external_calls: Option<bool>,
    /// Strip comments before comparing method bodies. Default: true.
    pub strip_comments: Option<bool>,
    /// Inventory methods of nested types as well. Default: false.
    pub include_nested_types: Option<bool>,
}

impl AnalysisConfig {
    pub fn effective_resolve_external_calls(&self) -> bool {
        self.resolve_external_calls.unwrap_or(false)
    }

    pub fn effective_strip_comments(&self) -> bool {
        self.strip_comments.unwrap_or(true)
    }

    pub fn effective_include_nested_types(&self) -> bool {
        self.include_nested_types.unwrap_or(false)
    }
}
