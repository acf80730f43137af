//! ComplyErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string
/// that callers (graders, CI scripts) can match on without parsing messages.
pub trait ComplyErrorCode {
    /// Returns the error code string (e.g., "SOURCE_NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
pub const RULE_CONFIG_ERROR: &str = "RULE_CONFIG_ERROR";
pub const SOURCE_NOT_FOUND: &str = "SOURCE_NOT_FOUND";
pub const CLASS_NOT_FOUND: &str = "CLASS_NOT_FOUND";
pub const INTERNAL_INVARIANT: &str = "INTERNAL_INVARIANT";
pub const UNSUPPORTED: &str = "UNSUPPORTED";
