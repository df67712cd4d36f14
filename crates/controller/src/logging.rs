//! Logging setup

use tracing_subscriber::EnvFilter;

/// Initialize logging. `RUST_LOG` overrides the level only when debug
/// logging is enabled; otherwise the level is pinned to `info`.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
