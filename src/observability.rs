//! Logging initialisation and span helpers for sync runs.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// JSON structured logs, one object per line.
    Json,
    /// Human-readable multi-line logs.
    #[default]
    Pretty,
}

/// Installs the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Only the first call
/// has any effect.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(env_filter);
        let installed = match format {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        };
        if let Err(err) = installed {
            tracing::debug!(error = %err, "a global subscriber was already installed");
        }
    });
}

/// Creates the span wrapping one sync run.
#[must_use]
pub fn sync_run_span(environment: &str, owner: &str) -> Span {
    tracing::info_span!("sync_run", environment = environment, owner = owner)
}
