//! Greeting HTTP service.
//!
//! Serves a greeting at `/`, a liveness probe at `/healthz` and Prometheus
//! metrics at `/metrics`, with every request counted and timed.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shutdown;

use axum::Router;
use axum::routing::get;
use telemetry::Registry;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use config::Config;
use error::StartupError;
use middleware::Endpoint;

/// Creates the Axum application router with all routes and instrumentation.
pub fn create_app(registry: Registry) -> Router {
    let router = Router::new()
        .route(Endpoint::Index.path(), get(routes::index::hello))
        .route(Endpoint::Healthz.path(), get(routes::health::check))
        .route(Endpoint::Metrics.path(), get(routes::metrics::get))
        .fallback(routes::not_found)
        .with_state(registry.clone());

    middleware::instrument(router, registry)
}

/// Binds the configured address and serves until a shutdown signal arrives.
pub async fn serve(config: &Config, registry: Registry) -> Result<(), StartupError> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
    serve_on(listener, registry).await
}

/// Serves on an already bound listener.
pub async fn serve_on(listener: TcpListener, registry: Registry) -> Result<(), StartupError> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "starting API server");

    let upkeep = spawn_upkeep(registry.clone());
    let served = axum::serve(listener, create_app(registry))
        .with_graceful_shutdown(shutdown::signal())
        .await;
    upkeep.abort();
    served?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

/// Drives [`Registry::run_upkeep`] every [`telemetry::UPKEEP_INTERVAL`] so
/// latency observations are folded into bucket tallies even without scrapes.
pub fn spawn_upkeep(registry: Registry) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(telemetry::UPKEEP_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            registry.run_upkeep();
        }
    })
}
