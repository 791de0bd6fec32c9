//! Prometheus exposition for the `metrics` facade.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the process-wide Prometheus recorder.
///
/// Safe to call more than once (integration tests build several
/// applications per process); only the first call installs the recorder.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Failed to install Prometheus recorder: {}", e);
                None
            }
        })
        .clone()
}

/// Render the current metrics in the Prometheus text format.
pub fn render_metrics() -> String {
    HANDLE
        .get()
        .and_then(|handle| handle.as_ref())
        .map(|handle| handle.render())
        .unwrap_or_default()
}
