//! Photo people tags, albums and full-size delivery.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use carmine_common::MediaKind;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::routes_media::{list_records, stream_media};
use super::{ApiResult, AppContext};
use crate::library::Album;
use crate::scanner::MediaRecord;

pub fn photo_routes() -> Router<AppContext> {
    Router::new()
        .route("/photos/tags/people", get(list_people))
        .route("/photos/by-person/:name", get(photos_by_person))
        .route("/photos/:id/tags", get(get_tags).put(set_tags))
        .route("/photos/:id/full", get(full_photo))
        .route("/photos/albums", post(create_album))
        .route("/photos/albums/all", get(list_albums))
        .route(
            "/photos/albums/:album_id",
            get(get_album).put(update_album).delete(delete_album),
        )
        .route(
            "/photos/albums/:album_id/photos",
            post(add_photos).delete(remove_photos),
        )
}

async fn full_photo(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    stream_media(ctx, MediaKind::Image, id, headers).await
}

// ============================================================================
// People tags
// ============================================================================

async fn list_people(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.library.tags.read(|t| t.all_people()))
}

async fn photos_by_person(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let photos = list_records(&ctx, MediaKind::Image).await?;
    let tagged: Vec<MediaRecord> = ctx.library.tags.read(|t| {
        photos
            .into_iter()
            .filter(|p| t.has_person(p.id.as_str(), &name))
            .collect()
    });
    Ok(Json(tagged))
}

#[derive(Serialize, Deserialize)]
struct PeopleTags {
    people: Vec<String>,
}

async fn get_tags(State(ctx): State<AppContext>, Path(id): Path<String>) -> impl IntoResponse {
    Json(PeopleTags {
        people: ctx.library.tags.read(|t| t.people(&id)),
    })
}

#[derive(Serialize)]
struct SetTagsResponse {
    success: bool,
    people: Vec<String>,
}

async fn set_tags(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<PeopleTags>,
) -> ApiResult<impl IntoResponse> {
    let people = ctx.library.tags.update(|t| Ok(t.set(&id, req.people)))?;
    Ok(Json(SetTagsResponse {
        success: true,
        people,
    }))
}

// ============================================================================
// Albums
// ============================================================================

async fn list_albums(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.library.albums.read(|a| a.albums.clone()))
}

#[derive(Deserialize)]
struct CreateAlbumRequest {
    #[serde(default)]
    name: String,
}

async fn create_album(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateAlbumRequest>,
) -> ApiResult<impl IntoResponse> {
    let album = ctx.library.albums.update(|a| a.create(&req.name))?;
    tracing::info!(id = %album.id, "Created album {:?}", album.name);
    Ok((StatusCode::CREATED, Json(album)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlbumWithPhotos {
    #[serde(flatten)]
    album: Album,
    photos: Vec<MediaRecord>,
}

async fn get_album(
    State(ctx): State<AppContext>,
    Path(album_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let album = ctx.library.albums.read(|a| a.get(&album_id).cloned())?;

    let mut by_id: HashMap<String, MediaRecord> = list_records(&ctx, MediaKind::Image)
        .await?
        .into_iter()
        .map(|p| (p.id.to_string(), p))
        .collect();
    // Ids whose files are gone are skipped, not pruned.
    let photos = album
        .photo_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect();

    Ok(Json(AlbumWithPhotos { album, photos }))
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAlbumRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    cover_photo_id: Option<Option<String>>,
}

async fn update_album(
    State(ctx): State<AppContext>,
    Path(album_id): Path<String>,
    Json(req): Json<UpdateAlbumRequest>,
) -> ApiResult<impl IntoResponse> {
    let album = ctx
        .library
        .albums
        .update(|a| a.update(&album_id, req.name.as_deref(), req.cover_photo_id))?;
    Ok(Json(album))
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

async fn delete_album(
    State(ctx): State<AppContext>,
    Path(album_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    ctx.library.albums.update(|a| a.delete(&album_id))?;
    tracing::info!(id = %album_id, "Deleted album");
    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoIdsRequest {
    photo_ids: Vec<String>,
}

async fn add_photos(
    State(ctx): State<AppContext>,
    Path(album_id): Path<String>,
    Json(req): Json<PhotoIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    let album = ctx
        .library
        .albums
        .update(|a| a.add_photos(&album_id, req.photo_ids))?;
    Ok(Json(album))
}

async fn remove_photos(
    State(ctx): State<AppContext>,
    Path(album_id): Path<String>,
    Json(req): Json<PhotoIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    let album = ctx
        .library
        .albums
        .update(|a| a.remove_photos(&album_id, &req.photo_ids))?;
    Ok(Json(album))
}
