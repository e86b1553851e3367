//! Video categories and TV shows.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use carmine_common::{MediaId, MediaKind};
use serde::{Deserialize, Serialize};

use super::routes_media::list_records;
use super::{ApiResult, AppContext};
use crate::library::{self, Episode};

pub fn video_routes() -> Router<AppContext> {
    Router::new()
        .route("/videos/categories", get(list_categories))
        .route("/videos/categories/:category_id", get(videos_in_category))
        .route("/videos/tvshows", get(list_tv_shows))
        .route("/videos/tvshows/:show_id/episodes", get(show_episodes))
        .route(
            "/videos/:id/category",
            get(get_category).put(set_category),
        )
}

async fn list_categories(State(ctx): State<AppContext>) -> ApiResult<impl IntoResponse> {
    let videos = list_records(&ctx, MediaKind::Video).await?;
    let counts = ctx.library.categories.read(|c| c.counts(&videos));
    Ok(Json(counts))
}

async fn videos_in_category(
    State(ctx): State<AppContext>,
    Path(category_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let videos = list_records(&ctx, MediaKind::Video).await?;
    let matching = ctx
        .library
        .categories
        .read(|c| c.filter(&category_id, videos));
    Ok(Json(matching))
}

async fn list_tv_shows(State(ctx): State<AppContext>) -> ApiResult<impl IntoResponse> {
    let videos = list_records(&ctx, MediaKind::Video).await?;
    let shows = ctx
        .library
        .categories
        .read(|c| library::tv_shows(c, videos));
    Ok(Json(shows))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EpisodesResponse {
    show_id: String,
    show_name: String,
    episodes: Vec<Episode>,
}

async fn show_episodes(
    State(ctx): State<AppContext>,
    Path(show_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let show_dir = show_id.parse::<MediaId>()?.resolve()?;
    let videos = list_records(&ctx, MediaKind::Video).await?;
    let episodes = ctx
        .library
        .categories
        .read(|c| library::episodes(c, &show_dir, videos));

    Ok(Json(EpisodesResponse {
        show_name: show_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        show_id,
        episodes,
    }))
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryAssignment {
    category_id: Option<String>,
}

async fn get_category(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let category_id = ctx
        .library
        .categories
        .read(|c| c.category_of(&id).map(String::from));
    Json(CategoryAssignment { category_id })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetCategoryResponse {
    success: bool,
    category_id: Option<String>,
}

async fn set_category(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<CategoryAssignment>,
) -> ApiResult<impl IntoResponse> {
    let category_id = ctx
        .library
        .categories
        .update(|c| c.assign(&id, req.category_id.as_deref()))?;
    tracing::debug!(category = ?category_id, "Assigned video category");
    Ok(Json(SetCategoryResponse {
        success: true,
        category_id,
    }))
}
