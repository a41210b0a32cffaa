use std::time::Duration;

use dynext_domain::impl_domain_status_conversions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Selects the log output format.
pub const LOG_FORMAT_VAR: &str = "DYNEXT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_domain_status_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`); `DYNEXT_LOG_FORMAT=json`
/// switches to JSON lines. Unknown formats fall back to text.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = std::env::var(LOG_FORMAT_VAR)
        .ok()
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();

    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).try_init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    }
}

/// Log the outcome of a resource or data source operation with structured
/// fields.
///
/// `target` and `operation` must be stable identifiers without user data.
#[inline]
pub fn log_operation(target: &str, operation: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(target_type = target, operation, duration_ms, "operation_success");
    } else {
        warn!(target_type = target, operation, duration_ms, "operation_failure");
    }
}
