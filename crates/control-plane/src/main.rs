// Agentry API server

use agentry_control_plane::config::ServerConfig;
use agentry_control_plane::rate_limit::spawn_purge_task;
use agentry_control_plane::storage::InMemoryStore;
use agentry_control_plane::{build_router, AppContext};
use agentry_core::telemetry::{init_telemetry, TelemetryConfig};
use agentry_core::{SimulatedInference, SimulatedInferenceConfig};
use anyhow::{Context, Result};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Values from .env never override variables already set
    dotenvy::dotenv().ok();

    // Configure via environment variables:
    // - RUST_LOG / LOG_LEVEL: Log filter (default: "agentry_control_plane=debug,tower_http=debug")
    // - SERVICE_NAME: Service name reported at startup
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "agentry" {
        telemetry_config.service_name = "agentry-control-plane".to_string();
    }
    init_telemetry(telemetry_config);

    let config = ServerConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(SimulatedInference::new(
        SimulatedInferenceConfig::default()
            .with_delay(config.inference_delay.min_ms, config.inference_delay.max_ms),
    ));

    let ctx = AppContext::new(store, gateway, &config);
    let purge_task = spawn_purge_task(ctx.limiter.clone());
    let app = build_router(&ctx, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(
        address = %format!("http://localhost:{}", config.port),
        docs = %format!("http://localhost:{}/swagger-ui", config.port),
        status = %format!("http://localhost:{}{}/status", config.port, config.api_prefix),
        environment = %config.mode,
        started_at = %Utc::now().to_rfc3339(),
        "Agentry API started"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    purge_task.abort();
    Ok(())
}
