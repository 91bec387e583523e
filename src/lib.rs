pub mod api;
pub mod config;
pub mod demo;
pub mod fallback;
pub mod format;
pub mod models;
pub mod portal;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, logging to stderr.
///
/// An explicit `level` wins over `RUST_LOG`, which wins over
/// [`config::default_log_filter`]. Calling it twice is harmless.
pub fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
