//! # Logging Setup
//!
//! Shared `tracing` initialisation for the binaries.

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber
///
/// Logs always go to stderr, filtered by `RUST_LOG` plus an INFO directive.
/// When `config.directory` is set they are also written to a daily-rolling
/// file named `<file_prefix>.<date>`.
///
/// # Returns
///
/// * `Some(WorkerGuard)` - Keep alive for the life of the program so
///   buffered file output is flushed
/// * `None` - No file output configured
pub fn init(config: &LoggingConfig, file_prefix: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    if config.directory.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.directory, file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Some(guard)
}
