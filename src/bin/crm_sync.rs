//! Syncs an exported event file into CRM follow-up tasks.
//!
//! Usage:
//!
//! ```text
//! crm-sync --config <config.json> --events <export.jsonl> [--log-format pretty|json]
//! ```
//!
//! The configuration names the CRM session, the task owner, the task status,
//! the event allow-list, the subject keys and the export window (see
//! [`crm_sync::config`]). The export holds one JSON event per line. The
//! process exits non-zero when configuration is invalid or the task owner
//! cannot be resolved; per-event failures are logged and counted instead.

use camino::Utf8PathBuf;
use clap::Parser;
use crm_sync::config::{ConfigError, SyncConfig};
use crm_sync::observability::{LogFormat, init_logging, sync_run_span};
use crm_sync::sync::{
    adapters::salesforce::SalesforceGateway,
    domain::SyncReport,
    ports::CrmGatewayError,
    services::{ExportReader, SourceError, SyncEngine, SyncError},
};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{Instrument, error, info};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "crm-sync", version, about = "Mirror analytics events into CRM tasks")]
struct Cli {
    /// Path to the JSON run configuration.
    #[arg(long)]
    config: Utf8PathBuf,

    /// Path to the JSON-lines event export.
    #[arg(long)]
    events: Utf8PathBuf,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("failed to open CRM session: {0}")]
    Session(#[source] CrmGatewayError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    init_logging(cli.log_format);
    match run(&cli) {
        Ok(report) => {
            info!(total = report.total(), "done");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "sync aborted");
            Err(err.into())
        }
    }
}

fn run(cli: &Cli) -> Result<SyncReport, CliError> {
    let config = SyncConfig::load(&cli.config)?;
    let settings = config.settings()?;
    let reader = ExportReader::new(config.selection(&DefaultClock)?);
    let events = reader.read(&cli.events)?;
    let gateway = SalesforceGateway::new(&config.crm).map_err(CliError::Session)?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;
    let span = sync_run_span(config.crm.environment(), &config.owner_name);
    runtime.block_on(
        async {
            let mut engine = SyncEngine::start(Arc::new(gateway), settings).await?;
            Ok::<_, CliError>(engine.run(events).await)
        }
        .instrument(span),
    )
}
