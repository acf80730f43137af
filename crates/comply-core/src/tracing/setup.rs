//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Filter used when `COMPLY_LOG` is unset or invalid. Targets are the
/// library crates' module paths.
pub const DEFAULT_FILTER: &str = "comply_core=info,comply_analysis=info";

/// Initialize the tracing/logging system.
///
/// Reads the `COMPLY_LOG` environment variable for per-module log levels.
/// Format: `COMPLY_LOG=comply_analysis::heuristics=debug,comply_analysis=info`
///
/// Falls back to [`DEFAULT_FILTER`] if `COMPLY_LOG` is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("COMPLY_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
