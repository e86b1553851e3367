//! Settings API routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use carmine_common::{Error, MediaKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{ApiResult, AppContext};
use crate::config::{MediaConfig, ServerConfig};
use crate::scanner::{self, ScanSummary};

pub fn settings_routes() -> Router<AppContext> {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route("/settings/scan", post(rescan))
        .route(
            "/settings/media/:collection",
            post(add_media_root).delete(remove_media_root),
        )
}

async fn get_settings(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.settings.snapshot())
}

#[derive(Deserialize)]
struct UpdateSettingsRequest {
    server: Option<ServerConfig>,
    media: Option<MediaConfig>,
}

async fn update_settings(
    State(ctx): State<AppContext>,
    Json(req): Json<UpdateSettingsRequest>,
) -> ApiResult<impl IntoResponse> {
    let config = ctx.settings.replace(req.server, req.media)?;
    tracing::info!("Settings updated");
    Ok(Json(config))
}

fn collection_kind(collection: &str) -> Result<MediaKind, Error> {
    MediaKind::from_collection(collection).ok_or_else(|| {
        Error::validation(format!(
            "invalid media type '{collection}', expected videos, music or photos"
        ))
    })
}

#[derive(Deserialize)]
struct MediaRootRequest {
    #[serde(default)]
    path: PathBuf,
}

async fn add_media_root(
    State(ctx): State<AppContext>,
    Path(collection): Path<String>,
    Json(req): Json<MediaRootRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = collection_kind(&collection)?;
    let config = ctx.settings.add_root(kind, req.path)?;
    Ok(Json(config))
}

async fn remove_media_root(
    State(ctx): State<AppContext>,
    Path(collection): Path<String>,
    Json(req): Json<MediaRootRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = collection_kind(&collection)?;
    Ok(Json(ctx.settings.remove_root(kind, &req.path)))
}

#[derive(Serialize)]
struct ScanResponse {
    success: bool,
    #[serde(flatten)]
    summary: ScanSummary,
}

async fn rescan(State(ctx): State<AppContext>) -> ApiResult<impl IntoResponse> {
    let summary = scanner::scan_summary(ctx.collection_roots()).await?;
    Ok(Json(ScanResponse {
        success: true,
        summary,
    }))
}
