mod records;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::request_id;
use crate::sink::RecordSink;
use crate::stats::IngestionStats;

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn RecordSink>,
    pub stats: Arc<IngestionStats>,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    endpoints: ServiceEndpoints,
}

#[derive(Debug, Serialize)]
struct ServiceEndpoints {
    health: &'static str,
    records: &'static str,
    stats: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct StatsData {
    received: u64,
    saved: u64,
    errors: u64,
    uptime_seconds: f64,
    sink_location: String,
}

fn build_cors() -> CorsLayer {
    // The capture agent posts from whatever origin the target site runs on.
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState, max_body_bytes: usize, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(service_index))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/records", post(records::ingest))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}

async fn service_index() -> impl IntoResponse {
    Json(ServiceInfo {
        service: "mapgrab ingestion server",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ServiceEndpoints {
            health: "/health",
            records: "/records (POST)",
            stats: "/stats",
        },
    })
}

/// Liveness only — no dependency checks by design.
async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        timestamp: Utc::now(),
    })
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.stats.snapshot();
    Json(StatsData {
        received: snapshot.received,
        saved: snapshot.saved,
        errors: snapshot.errors,
        uptime_seconds: snapshot.uptime.as_secs_f64(),
        sink_location: state.sink.location().display().to_string(),
    })
}
