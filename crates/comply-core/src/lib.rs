//! comply-core: shared foundations for the compliance checker.
//!
//! - Errors: one `thiserror` enum per subsystem, each with a stable error code
//! - Config: TOML-based, layered resolution (CLI > env > project > user > defaults)
//! - Tracing: `COMPLY_LOG`-driven `EnvFilter` setup
//! - Types: collection aliases shared across crates

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::ComplyConfig;
pub use errors::{ComplianceError, ConfigError, ParseError, RuleError};
