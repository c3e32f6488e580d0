//! Logging setup for the trellis binary.
//!
//! Logs go to stderr so they never mix with command output. The filter comes
//! from `TRELLIS_LOG` (default `warn`); `--debug` forces `debug` so the
//! command trace of a build is visible.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "TRELLIS_LOG";

fn filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber
pub fn init(debug: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter(debug))
        .with(layer)
        .try_init();
}
