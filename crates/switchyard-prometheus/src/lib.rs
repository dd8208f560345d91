// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for the Switchyard proxy.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. Metrics are
//! rendered as Prometheus text format via [`PrometheusExporter::render`],
//! which the gateway exposes at `/metrics`.

pub mod recording;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use switchyard_core::SwitchyardError;

pub use recording::{
    record_chunk, record_relay, record_request, record_ttft, record_usage, register_metrics,
};

/// Installed Prometheus recorder plus the handle used to render it.
#[derive(Clone)]
pub struct PrometheusExporter {
    handle: PrometheusHandle,
}

impl PrometheusExporter {
    /// Install the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn install() -> Result<Self, SwitchyardError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            SwitchyardError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Wrap an existing handle, e.g. from a locally scoped recorder.
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
