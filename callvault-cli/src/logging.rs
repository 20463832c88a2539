//! tracing-subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingSettings;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr so decrypted output on stdout stays clean.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match settings.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
