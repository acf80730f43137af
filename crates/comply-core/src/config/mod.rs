//! Configuration system for the compliance checker.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod analysis_config;
pub mod assignment_config;
pub mod comply_config;
pub mod report_config;

pub use analysis_config::AnalysisConfig;
pub use assignment_config::AssignmentConfig;
pub use comply_config::{CliOverrides, ComplyConfig};
pub use report_config::{ReportConfig, ReportFormat};
