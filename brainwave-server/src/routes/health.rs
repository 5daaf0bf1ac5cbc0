use axum::{Json, extract::State};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct Welcome {
    pub message: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LiveStatus {
    pub status: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dependencies {
    pub database: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadyStatus {
    pub status: &'static str,
    pub build_info: BuildInfo,
    pub dependencies: Dependencies,
    /// Seconds since the server started
    pub uptime: f64,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Greeting", body = Welcome))
)]
pub async fn index() -> Json<Welcome> {
    Json(Welcome {
        message: "Brainwave is alive!",
    })
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses((status = 200, description = "The process is up", body = LiveStatus))
)]
pub async fn live() -> Json<LiveStatus> {
    Json(LiveStatus { status: "ok" })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses((status = 200, description = "Readiness and dependency status", body = ReadyStatus))
)]
pub async fn ready(State(state): State<AppState>) -> Json<ReadyStatus> {
    let database = state.db.execute_unprepared("SELECT 1").await.is_ok();
    if !database {
        tracing::warn!("Database ping failed");
    }

    Json(ReadyStatus {
        status: if database { "ok" } else { "degraded" },
        build_info: BuildInfo {
            version: env!("CARGO_PKG_VERSION"),
            git_sha: option_env!("BRAINWAVE_GIT_SHA").unwrap_or("unknown"),
        },
        dependencies: Dependencies { database },
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
