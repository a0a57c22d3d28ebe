//! Greeting endpoint.

use axum::Json;
use serde::Serialize;

pub const GREETING: &str = "Hello from Lab2!";

#[derive(Serialize)]
pub struct Greeting {
    pub message: &'static str,
}

/// GET / — returns the greeting.
pub async fn hello() -> Json<Greeting> {
    Json(Greeting { message: GREETING })
}
