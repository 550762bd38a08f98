//! Structured logging setup
//!
//! Log level resolution, highest priority first:
//! 1. `RUST_LOG` environment variable
//! 2. `core.log_level` from the config file
//! 3. "info"
//!
//! Debug builds log pretty-printed output for terminal use; release builds
//! emit JSON lines so a daily scheduled run can be shipped to a collector.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(log_level: &str) -> EnvFilter {
    let fallback = format!("{},mvpforge={}", log_level, log_level);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback))
}

/// Install the global tracing subscriber at the given level.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_telemetry_with_level(log_level: &str) {
    let filter = env_filter(log_level);

    #[cfg(debug_assertions)]
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().pretty().with_target(false));

    #[cfg(not(debug_assertions))]
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(true));

    subscriber.try_init().ok();
}

/// Install the global tracing subscriber at "info", for contexts where no
/// config has been loaded yet.
pub fn init_telemetry() {
    init_telemetry_with_level("info");
}
