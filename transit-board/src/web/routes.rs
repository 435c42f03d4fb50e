//! HTTP route handlers.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use tower_http::services::ServeDir;

use crate::board::HEALTH_SOURCES;
use crate::health::{HealthReport, health_report};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// When `static_dir` is given, unmatched paths are served from it, so the
/// frontend lives at `/`.
pub fn create_router<P>(state: AppState<P>, static_dir: Option<&str>) -> Router
where
    P: Send + Sync + 'static,
{
    let router = Router::new()
        .route("/health", get(health::<P>))
        .route("/api/health", get(health::<P>))
        .route("/api/subway", get(subway::<P>))
        .route("/api/inbound", get(inbound::<P>))
        .route("/api/config", get(frontend_config::<P>));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.with_state(state)
}

/// Per-source freshness and overall status.
async fn health<P>(State(state): State<AppState<P>>) -> Json<HealthReport> {
    Json(health_report(
        &HEALTH_SOURCES,
        &state.board.source_metadata(),
        &state.display,
        state.started_at,
        Utc::now(),
    ))
}

/// Next arrivals at every configured station direction.
async fn subway<P>(State(state): State<AppState<P>>) -> Json<SubwayResponse> {
    let entry = state.board.arrivals().await;
    Json(SubwayResponse::new(&entry.data, entry.last_updated, Utc::now()))
}

/// Trains tracked along the corridor.
async fn inbound<P>(State(state): State<AppState<P>>) -> Json<InboundResponse> {
    let entry = state.board.inbound().await;
    Json(InboundResponse::new(
        &entry.data,
        entry.last_updated,
        state.board.corridor(),
    ))
}

/// Station blocks and display thresholds for the frontend.
async fn frontend_config<P>(State(state): State<AppState<P>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        success: true,
        data: FrontendConfig::new(
            &state.display,
            &state.location,
            state.board.station_blocks(),
        ),
    })
}
