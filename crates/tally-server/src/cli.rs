//! CLI module for tally-server.
//!
//! Used by the standalone binary and by the `tally run` subcommand.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tally_config::{CliOverrides, LoggingConfig, apply_overrides, load_config, validate_config};
use tally_core::{DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL, DEFAULT_LOG_OUTPUT, VERSION};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{CancellationToken, ServerError, Service};

/// tally server CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "tally-server", version, about = "Traffic accounting side-car")]
pub struct ServerArgs {
    /// Config file path (json/yaml/toml)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Load configuration and run the service until SIGINT/SIGTERM.
pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let mut config = load_config(&args.config)?;
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    init_tracing(&config.logging);

    if let Some(listen) = &config.metrics.listen {
        start_metrics(listen)?;
        info!(addr = %listen, "prometheus exporter listening");
    }

    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        let signal = wait_for_shutdown_signal().await;
        info!(signal, "shutdown signal received");
        shutdown_signal.cancel();
    });

    info!(
        version = VERSION,
        panel = %config.panel.api_host,
        node_id = config.panel.node_id,
        refresh_interval_secs = config.identity.refresh_interval_secs,
        push_interval_secs = config.reconcile.push_interval_secs,
        "starting tally"
    );
    Service::new(config).run(shutdown).await.inspect_err(|e| {
        tally_metrics::record_error(e.error_type());
        error!(error = %e, "service stopped with error");
    })
}

fn start_metrics(listen: &str) -> Result<(), ServerError> {
    tally_metrics::init_prometheus(listen).map_err(ServerError::Metrics)
}

/// Resolve once SIGINT or SIGTERM arrives, returning the signal name.
///
/// A signal whose handler cannot be installed is logged and never fires.
async fn wait_for_shutdown_signal() -> &'static str {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGINT");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}

/// Build the filter directive string from the base level and per-module filters.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = config
        .level
        .as_deref()
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_string();
    let mut modules: Vec<_> = config.filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        directives.push(',');
        directives.push_str(module);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}

fn log_writer(output: &str) -> BoxMakeWriter {
    match output {
        "stdout" => BoxMakeWriter::new(io::stdout),
        _ => BoxMakeWriter::new(io::stderr),
    }
}

/// Initialize the tracing subscriber.
///
/// `format` is one of pretty (default), json or compact; `output` is stderr
/// (default) or stdout.
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let writer = log_writer(config.output.as_deref().unwrap_or(DEFAULT_LOG_OUTPUT));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_deref().unwrap_or(DEFAULT_LOG_FORMAT) {
        "json" => registry.with(fmt::layer().json().with_writer(writer)).init(),
        "compact" => registry.with(fmt::layer().compact().with_writer(writer)).init(),
        _ => registry.with(fmt::layer().with_writer(writer)).init(),
    }
}
