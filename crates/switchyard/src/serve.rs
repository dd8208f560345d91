// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard serve` command implementation.
//!
//! Wires configuration, metrics, and the usage ledger into the gateway, then
//! serves until a shutdown signal arrives.

use std::sync::Arc;

use switchyard_config::{LedgerMode, SwitchyardConfig};
use switchyard_core::{LogLedger, NoopLedger, SwitchyardError, UsageLedger};
use switchyard_gateway::{GatewayState, HealthState};
use switchyard_prometheus::PrometheusExporter;
use tracing::{info, warn};

use crate::shutdown;

/// Ledger implementation selected by configuration.
fn ledger_for(mode: LedgerMode) -> Arc<dyn UsageLedger> {
    match mode {
        LedgerMode::Off => Arc::new(NoopLedger),
        LedgerMode::Log => Arc::new(LogLedger),
    }
}

/// Runs the proxy until SIGINT/SIGTERM.
pub async fn run_serve(config: SwitchyardConfig) -> Result<(), SwitchyardError> {
    init_tracing(&config.logging.level);

    info!(
        upstream = config.provider.chat_url().as_str(),
        routing = config.routing.enabled,
        force_model = config.routing.force_model.as_deref(),
        audit = config.proxy.audit,
        offline = config.proxy.offline,
        "starting switchyard"
    );

    let prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>> =
        match PrometheusExporter::install() {
            Ok(exporter) => Some(Arc::new(move || exporter.render())),
            Err(e) => {
                warn!(error = %e, "prometheus initialization failed, continuing without metrics");
                None
            }
        };

    let ledger = ledger_for(config.ledger.mode);
    info!(ledger = ledger.name(), "usage ledger ready");

    let state = GatewayState::from_config(&config, ledger, HealthState::new(prometheus_render))?;

    let cancel = shutdown::install_signal_handler();
    switchyard_gateway::start_server(&config.server.host, config.server.port, state, cancel).await?;

    info!("switchyard shut down cleanly");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchyard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
