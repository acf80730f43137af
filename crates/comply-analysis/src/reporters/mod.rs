//! Reporters: output formats for compliance results.

pub mod json;
pub mod text;

use comply_core::config::ReportFormat;

use crate::compliance::ComplianceResult;
use crate::requirements::FormatOptions;

/// Trait for report generation.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, result: &ComplianceResult) -> Result<String, String>;
}

/// Create a reporter by format name.
pub fn create_reporter(format: &str, options: FormatOptions) -> Option<Box<dyn Reporter>> {
    match format {
        "text" => Some(Box::new(text::TextReporter::new(options))),
        "json" => Some(Box::new(json::JsonReporter)),
        _ => None,
    }
}

/// Reporter for a configured format.
pub fn reporter_for(format: ReportFormat, options: FormatOptions) -> Box<dyn Reporter> {
    match format {
        ReportFormat::Text => Box::new(text::TextReporter::new(options)),
        ReportFormat::Json => Box::new(json::JsonReporter),
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["text", "json"]
}
