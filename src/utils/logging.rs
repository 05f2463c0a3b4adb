//! Logging initialisation

use tracing_subscriber::EnvFilter;

use crate::adapters::toml_config::LoggingSettings;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice
/// is harmless; the second subscriber is ignored.
pub fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
