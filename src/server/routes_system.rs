//! Library statistics and host information.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use carmine_common::{Error, MediaKind};
use serde::Serialize;

use super::{ApiResult, AppContext};
use crate::{scanner, system};

pub fn system_routes() -> Router<AppContext> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/system", get(get_system))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    videos: usize,
    music: usize,
    photos: usize,
    total_files: usize,
}

async fn get_stats(State(ctx): State<AppContext>) -> ApiResult<impl IntoResponse> {
    let videos = scanner::count_roots(ctx.settings.roots(MediaKind::Video), MediaKind::Video).await?;
    let music = scanner::count_roots(ctx.settings.roots(MediaKind::Audio), MediaKind::Audio).await?;
    let photos = scanner::count_roots(ctx.settings.roots(MediaKind::Image), MediaKind::Image).await?;

    Ok(Json(StatsResponse {
        videos,
        music,
        photos,
        total_files: videos + music + photos,
    }))
}

async fn get_system(State(ctx): State<AppContext>) -> ApiResult<impl IntoResponse> {
    let data_dir = ctx.settings.data_dir();
    let uptime = ctx.started_at.elapsed();
    let info = tokio::task::spawn_blocking(move || system::collect(&data_dir, uptime))
        .await
        .map_err(|e| Error::internal(format!("System stats task failed: {e}")))?;
    Ok(Json(info))
}
