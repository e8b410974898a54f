// * Telemetry - structured logging to stderr
// * stdout is reserved for the summary itself, so every layer writes to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// * Filter used when RUST_LOG is unset
const DEFAULT_LEVEL: &str = "info";

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use page_brief::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://example.com", "Fetching page");
/// ```
pub fn init_tracing() {
    init_tracing_with_level(DEFAULT_LEVEL);
}

/// Initializes tracing with custom log level
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Initializes tracing with human-readable formatting
pub fn init_tracing_pretty(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}
