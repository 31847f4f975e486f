use metrics_exporter_prometheus::PrometheusHandle;
use reviewsense_pipeline::Orchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded models, shared read-only by every request
    pub orchestrator: Orchestrator,

    /// Prometheus recorder handle; absent when metrics are not installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
