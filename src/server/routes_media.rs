//! Routes shared by every collection: list, detail, delete and stream.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use carmine_common::MediaKind;
use serde::Serialize;

use super::{ApiResult, AppContext};
use crate::scanner::{self, MediaRecord, TrackMetadata};
use crate::streaming;

/// `/{collection}`, `/{collection}/:id` and `/{collection}/:id/stream`.
pub fn media_routes(kind: MediaKind) -> Router<AppContext> {
    let base = format!("/{}", kind.collection());
    Router::new()
        .route(
            &base,
            get(move |State(ctx): State<AppContext>| list_media(ctx, kind)),
        )
        .route(
            &format!("{base}/:id"),
            get(move |State(ctx): State<AppContext>, Path(id): Path<String>| {
                get_media(ctx, kind, id)
            })
            .delete(move |State(ctx): State<AppContext>, Path(id): Path<String>| {
                delete_media(ctx, kind, id)
            }),
        )
        .route(
            &format!("{base}/:id/stream"),
            get(
                move |State(ctx): State<AppContext>, Path(id): Path<String>, headers: HeaderMap| {
                    stream_media(ctx, kind, id, headers)
                },
            ),
        )
}

/// A music listing entry: the record plus filename-derived track details.
#[derive(Serialize)]
struct TrackRecord {
    #[serde(flatten)]
    record: MediaRecord,
    metadata: TrackMetadata,
}

/// Scan, sort and return a collection.
pub async fn list_records(ctx: &AppContext, kind: MediaKind) -> ApiResult<Vec<MediaRecord>> {
    let mut records = scanner::scan_roots(ctx.settings.roots(kind), Some(kind)).await?;
    scanner::sort_for_collection(&mut records, kind);
    Ok(records)
}

async fn list_media(ctx: AppContext, kind: MediaKind) -> ApiResult<Response> {
    let records = list_records(&ctx, kind).await?;
    tracing::debug!(collection = kind.collection(), count = records.len(), "Listed media");

    if kind == MediaKind::Audio {
        let tracks: Vec<TrackRecord> = records
            .into_iter()
            .map(|record| TrackRecord {
                metadata: TrackMetadata::from_path(&record.path),
                record,
            })
            .collect();
        return Ok(Json(tracks).into_response());
    }
    Ok(Json(records).into_response())
}

async fn get_media(ctx: AppContext, kind: MediaKind, id: String) -> ApiResult<impl IntoResponse> {
    let path = streaming::resolve_media(&id, kind, &ctx.settings.roots(kind))?;
    Ok(Json(scanner::media_info(&path)?))
}

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
    message: String,
}

async fn delete_media(ctx: AppContext, kind: MediaKind, id: String) -> ApiResult<impl IntoResponse> {
    let path = streaming::resolve_media(&id, kind, &ctx.settings.roots(kind))?;
    tokio::fs::remove_file(&path).await?;
    tracing::info!(collection = kind.collection(), "Deleted {:?}", path);

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("{} deleted successfully", kind.noun()),
    }))
}

/// Resolve an id within a collection and stream it with range support.
pub async fn stream_media(
    ctx: AppContext,
    kind: MediaKind,
    id: String,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let path = streaming::resolve_media(&id, kind, &ctx.settings.roots(kind))?;
    let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());
    tracing::debug!(collection = kind.collection(), range, "Streaming {:?}", path);
    Ok(streaming::serve_file(&path, kind.fallback_content_type(), range).await?)
}
