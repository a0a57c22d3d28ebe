//! Prometheus-backed request registry.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use crate::Sample;
use crate::error::{RegistryError, Result};

/// Histogram of request durations, labeled by endpoint and method.
pub const REQUEST_LATENCY: &str = "http_request_duration_seconds";

/// Counter of completed requests, labeled by endpoint, method and status.
pub const REQUEST_COUNT: &str = "http_requests_total";

/// Content type of the Prometheus text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Latency buckets in seconds, matching the usual Prometheus client defaults.
pub const DEFAULT_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// How often [`Registry::run_upkeep`] should be driven between scrapes.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Request counter and latency histogram for one process.
///
/// The registry owns its recorder instead of installing a global one, so
/// every clone shares the same accumulated state and independent registries
/// never see each other's samples.
#[derive(Clone)]
pub struct Registry {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl Registry {
    /// Creates a registry with [`DEFAULT_BUCKETS`].
    pub fn new() -> Result<Self> {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Creates a registry with custom latency buckets.
    pub fn with_buckets(buckets: &[f64]) -> Result<Self> {
        if buckets.is_empty() {
            return Err(RegistryError::EmptyBuckets);
        }

        let recorder = PrometheusBuilder::new()
            .set_buckets(buckets)?
            .build_recorder();
        let handle = recorder.handle();

        let registry = Self {
            recorder: Arc::new(recorder),
            handle,
        };
        registry.describe();
        tracing::debug!(buckets = buckets.len(), "metrics registry created");
        Ok(registry)
    }

    fn describe(&self) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            metrics::describe_histogram!(REQUEST_LATENCY, "Request latency");
            metrics::describe_counter!(REQUEST_COUNT, "Total HTTP Requests");
        });
    }

    /// Records one latency observation for `endpoint` and `method`.
    pub fn observe_latency(&self, endpoint: &'static str, method: &'static str, seconds: f64) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            metrics::histogram!(REQUEST_LATENCY, "endpoint" => endpoint, "method" => method)
                .record(seconds);
        });
    }

    /// Increments the request counter for `endpoint`, `method` and `status`.
    pub fn increment_count(&self, endpoint: &'static str, method: &'static str, status: u16) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            metrics::counter!(
                REQUEST_COUNT,
                "endpoint" => endpoint,
                "method" => method,
                "status" => status.to_string()
            )
            .increment(1);
        });
    }

    /// Records a completed request: one latency observation and one count.
    pub fn record(&self, sample: &Sample) {
        self.observe_latency(sample.endpoint, sample.method, sample.seconds());
        self.increment_count(sample.endpoint, sample.method, sample.status);
    }

    /// Folds buffered latency observations into bucket tallies.
    ///
    /// Histogram observations are buffered until the next render or upkeep,
    /// so a registry that is never scraped must have this called on a timer
    /// (see [`UPKEEP_INTERVAL`]).
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }

    /// Renders all accumulated state in the Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}
