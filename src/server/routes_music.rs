//! Music playlists.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{ApiResult, AppContext};

pub fn music_routes() -> Router<AppContext> {
    Router::new()
        .route("/music/playlists", post(create_playlist))
        .route("/music/playlists/all", get(list_playlists))
        .route(
            "/music/playlists/:id",
            get(get_playlist).put(update_playlist).delete(delete_playlist),
        )
        .route(
            "/music/playlists/:id/tracks",
            post(add_tracks).delete(remove_tracks),
        )
}

async fn list_playlists(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.library.playlists.read(|p| p.playlists.clone()))
}

async fn get_playlist(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let playlist = ctx.library.playlists.read(|p| p.get(&id).cloned())?;
    Ok(Json(playlist))
}

#[derive(Deserialize)]
struct CreatePlaylistRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    tracks: Vec<String>,
}

async fn create_playlist(
    State(ctx): State<AppContext>,
    Json(req): Json<CreatePlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist = ctx
        .library
        .playlists
        .update(|p| p.create(&req.name, req.tracks))?;
    tracing::info!(id = %playlist.id, "Created playlist {:?}", playlist.name);
    Ok(Json(playlist))
}

#[derive(Deserialize)]
struct UpdatePlaylistRequest {
    name: Option<String>,
    tracks: Option<Vec<String>>,
}

async fn update_playlist(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist = ctx
        .library
        .playlists
        .update(|p| p.update(&id, req.name.as_deref(), req.tracks))?;
    Ok(Json(playlist))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackIdsRequest {
    track_ids: Vec<String>,
}

async fn add_tracks(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<TrackIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist = ctx
        .library
        .playlists
        .update(|p| p.add_tracks(&id, req.track_ids))?;
    Ok(Json(playlist))
}

async fn remove_tracks(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<TrackIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist = ctx
        .library
        .playlists
        .update(|p| p.remove_tracks(&id, &req.track_ids))?;
    Ok(Json(playlist))
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

async fn delete_playlist(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    ctx.library.playlists.update(|p| p.delete(&id))?;
    tracing::info!(id = %id, "Deleted playlist");
    Ok(Json(SuccessResponse { success: true }))
}
