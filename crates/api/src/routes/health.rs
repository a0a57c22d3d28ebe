use axum::Json;
use serde::Serialize;

/// Liveness payload. The service has no dependencies to check, so it is
/// always `ok` while the process can answer.
#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
}

impl Liveness {
    pub const OK: Liveness = Liveness { status: "ok" };
}

/// GET /healthz
pub async fn check() -> Json<Liveness> {
    Json(Liveness::OK)
}
