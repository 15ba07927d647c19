//! Application state for the OGC API.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use ogc_protocol::ServiceCatalog;

use crate::feature_source::{FeatureSource, MemoryFeatureSource};
use crate::renderer::{MapRenderer, PlaceholderRenderer};

/// Shared application state.
///
/// The catalog is read-only after startup; the renderer and feature source
/// are the injected collaborator seams.
pub struct AppState {
    pub catalog: Arc<ServiceCatalog>,

    pub renderer: Arc<dyn MapRenderer>,

    pub feature_source: Arc<dyn FeatureSource>,

    /// Upper bound on any single collaborator call.
    pub collaborator_timeout: Duration,

    /// Prometheus render handle, absent in tests.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// State with the default in-process collaborators.
    pub fn new(catalog: ServiceCatalog, collaborator_timeout: Duration) -> Self {
        Self {
            catalog: Arc::new(catalog),
            renderer: Arc::new(PlaceholderRenderer),
            feature_source: Arc::new(MemoryFeatureSource::with_sample_data()),
            collaborator_timeout,
            metrics_handle: None,
        }
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
