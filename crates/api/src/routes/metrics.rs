//! Prometheus scrape endpoint.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use telemetry::Registry;

/// Registry state rendered in the Prometheus text exposition format.
#[derive(Debug)]
pub struct Exposition(pub String);

impl IntoResponse for Exposition {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, telemetry::CONTENT_TYPE)], self.0).into_response()
    }
}

/// GET /metrics
pub async fn get(State(registry): State<Registry>) -> Exposition {
    Exposition(registry.render())
}
