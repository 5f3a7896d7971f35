use std::env;

use tracing_subscriber::EnvFilter;

fn env_requests_debug(value: Option<&str>) -> bool {
    value.is_some_and(|value| matches!(value, "1" | "true" | "TRUE" | "yes" | "YES"))
}

/// `PRESENCE_DEBUG_LOG` or the `debug_logging_enabled` setting forces debug output.
fn debug_requested(env_value: Option<&str>, debug_logging_enabled: bool) -> bool {
    debug_logging_enabled || env_requests_debug(env_value)
}

/// Installs the stderr subscriber. stdout is reserved for the JSON report.
pub fn init(debug_logging_enabled: bool) {
    let env_value = env::var("PRESENCE_DEBUG_LOG").ok();
    let filter = if debug_requested(env_value.as_deref(), debug_logging_enabled) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
