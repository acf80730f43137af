//! Error handling for the compliance checker.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod compliance_error;
pub mod config_error;
pub mod error_code;
pub mod parse_error;
pub mod rule_error;

pub use compliance_error::{ComplianceError, SourceCategory};
pub use config_error::ConfigError;
pub use error_code::ComplyErrorCode;
pub use parse_error::ParseError;
pub use rule_error::RuleError;
