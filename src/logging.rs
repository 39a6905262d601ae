//! Tracing subscriber initialization for embedding applications.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ScannerConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once (e.g. from tests) is harmless; later calls are ignored.
pub fn init_tracing(level: &str, json: bool) {
    let default_directive = format!("stockscan={}", level);
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter_directive));

    if json {
        let _ = registry.with(fmt::layer().json()).try_init();
    } else {
        let _ = registry.with(fmt::layer()).try_init();
    }
}

/// Initialize tracing from the client configuration.
pub fn init_from_config(config: &ScannerConfig) {
    init_tracing(&config.log_level, config.log_json);
}
