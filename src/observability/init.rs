//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber that receives the spans and
//! events emitted by the state operations, writing them to a rotating file.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when none is configured.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Initializes the tracing subscriber with rotating file output.
///
/// Sets up a pipeline that:
/// 1. Filters spans and events with an `EnvFilter` built from `trace_level`
/// 2. Formats them with the `fmt` layer (no ANSI colors)
/// 3. Writes them to `trace_file` through a [`FileWriter`]
///
/// # Initialization Behavior
///
/// - Does nothing if `trace_file` is not configured
/// - Creates the trace file's parent directory if it doesn't exist
/// - Silently gives up if directory creation fails (tracing is optional)
/// - Idempotent: only the first successful call installs a subscriber
///
/// Returns `true` if this call installed the global subscriber.
///
/// # Example
///
/// ```rust
/// use bookmark_state::observability::init_tracing;
/// use bookmark_state::Config;
///
/// let config = Config::default();
/// assert!(!init_tracing(&config));
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let Some(trace_file) = config.trace_file.clone() else {
        return false;
    };

    if let Some(parent) = trace_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }

    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_TRACE_LEVEL);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_LEVEL));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(FileWriter::new(trace_file));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_ok()
}
