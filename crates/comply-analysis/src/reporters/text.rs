//! Text reporter: the plain report meant for console and logs.

use super::Reporter;
use crate::compliance::ComplianceResult;
use crate::requirements::FormatOptions;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextReporter {
    options: FormatOptions,
}

impl TextReporter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }
}

impl Reporter for TextReporter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn generate(&self, result: &ComplianceResult) -> Result<String, String> {
        Ok(result.render(&self.options))
    }
}
