//! Request instrumentation.
//!
//! Every response passing through [`track`] produces exactly one
//! [`Sample`]: a latency observation labeled by endpoint and method, and a
//! count labeled by endpoint, method and final status code.

use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::{MatchedPath, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use telemetry::{Registry, Sample};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Endpoint label for requests that matched no route.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Method label for non-standard HTTP methods.
pub const OTHER_METHOD_LABEL: &str = "OTHER";

/// The fixed set of routes the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    Healthz,
    Metrics,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Index, Endpoint::Healthz, Endpoint::Metrics];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Index => "/",
            Endpoint::Healthz => "/healthz",
            Endpoint::Metrics => "/metrics",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Index => "index",
            Endpoint::Healthz => "healthz",
            Endpoint::Metrics => "metrics",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|endpoint| endpoint.path() == path)
    }
}

/// Resolves the endpoint label for a finished request.
///
/// Routing failures (no matched path, or 405) carry no endpoint.
pub fn endpoint_label(matched_path: Option<&str>, status: StatusCode) -> &'static str {
    if status == StatusCode::METHOD_NOT_ALLOWED {
        return UNKNOWN_LABEL;
    }
    matched_path
        .and_then(Endpoint::from_path)
        .map_or(UNKNOWN_LABEL, Endpoint::label)
}

pub fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => OTHER_METHOD_LABEL,
    }
}

/// Start time of an in-flight request.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimer {
    started: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Records a [`Sample`] for every request/response cycle.
pub async fn track(State(registry): State<Registry>, request: Request, next: Next) -> Response {
    let timer = RequestTimer::start();
    let method = method_label(request.method());
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());

    let response = next.run(request).await;

    let status = response.status();
    let sample = Sample::new(
        endpoint_label(matched_path.as_deref(), status),
        method,
        status.as_u16(),
        timer.elapsed(),
    );
    record_quietly(&sample, |sample| registry.record(sample));

    response
}

/// Runs `record` for `sample`, logging instead of unwinding if it panics.
fn record_quietly(sample: &Sample, record: impl FnOnce(&Sample)) {
    if std::panic::catch_unwind(AssertUnwindSafe(|| record(sample))).is_err() {
        tracing::warn!(?sample, "failed to record request metrics");
    }
}

/// Wraps `router` with panic recovery, request metrics and request tracing.
///
/// Panic recovery sits inside [`track`] so that a failing handler is still
/// counted, as a 500.
pub fn instrument(router: Router, registry: Registry) -> Router {
    router
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(registry, track))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_round_trip() {
        for endpoint in Endpoint::ALL {
            assert_eq!(Endpoint::from_path(endpoint.path()), Some(endpoint));
        }
        assert_eq!(Endpoint::from_path("/missing"), None);
    }

    #[test]
    fn matched_paths_map_to_labels() {
        assert_eq!(endpoint_label(Some("/"), StatusCode::OK), "index");
        assert_eq!(endpoint_label(Some("/healthz"), StatusCode::OK), "healthz");
        assert_eq!(endpoint_label(Some("/metrics"), StatusCode::OK), "metrics");
    }

    #[test]
    fn routing_failures_are_unknown() {
        assert_eq!(endpoint_label(None, StatusCode::NOT_FOUND), UNKNOWN_LABEL);
        assert_eq!(
            endpoint_label(Some("/"), StatusCode::METHOD_NOT_ALLOWED),
            UNKNOWN_LABEL
        );
    }

    #[test]
    fn handler_errors_keep_endpoint() {
        assert_eq!(
            endpoint_label(Some("/"), StatusCode::INTERNAL_SERVER_ERROR),
            "index"
        );
    }

    #[test]
    fn recording_panic_is_swallowed() {
        let sample = Sample::new("index", "GET", 200, Duration::from_millis(1));

        record_quietly(&sample, |_| panic!("label rejected"));
    }

    #[test]
    fn recording_receives_sample() {
        let sample = Sample::new("healthz", "GET", 200, Duration::from_millis(1));
        let mut seen = None;

        record_quietly(&sample, |recorded| seen = Some(*recorded));

        assert_eq!(seen, Some(sample));
    }

    #[test]
    fn extension_methods_collapse() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::DELETE), "DELETE");
        let custom = Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(method_label(&custom), OTHER_METHOD_LABEL);
    }
}
