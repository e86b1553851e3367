//! Direct file streaming with HTTP range requests.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use carmine_common::paths::content_type;
use carmine_common::Error;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::{parse_range, RangeError};

/// Read size for the body stream.
const CHUNK_SIZE: usize = 64 * 1024;

/// Serve a file, honoring a single byte range.
///
/// Without a range the whole file is sent with `200`. A satisfiable range
/// yields `206` with exactly the requested bytes; a malformed or
/// unsatisfiable one yields `416` with `Content-Range: bytes */size`.
/// Reads are streamed in 64 KiB chunks, so memory stays bounded regardless
/// of file size. Dropping the body (client disconnect) closes the file.
pub async fn serve_file(
    path: &Path,
    fallback_content_type: &'static str,
    range_header: Option<&str>,
) -> Result<Response, Error> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| Error::not_found("file", path.display()))?;
    let file_size = metadata.len();
    let content_type = content_type(path).unwrap_or(fallback_content_type);

    let range = match range_header.map(|h| parse_range(h, file_size)) {
        None => None,
        Some(Ok(range)) => Some(range),
        Some(Err(e)) => {
            tracing::debug!("Rejecting range for {:?}: {}", path, e);
            return Ok(range_not_satisfiable(file_size, &e));
        }
    };

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|_| Error::not_found("file", path.display()))?;

    match range {
        Some(range) => {
            file.seek(std::io::SeekFrom::Start(range.start))
                .await
                .map_err(|e| Error::internal(format!("Seek failed: {e}")))?;

            let length = range.len();
            let stream = ReaderStream::with_capacity(file.take(length), CHUNK_SIZE);

            Ok((
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (header::CONTENT_RANGE, range.content_range(file_size)),
                    (header::CONTENT_LENGTH, length.to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::from_stream(stream),
            )
                .into_response())
        }
        None => {
            let stream = ReaderStream::with_capacity(file.take(file_size), CHUNK_SIZE);

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (header::CONTENT_LENGTH, file_size.to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::from_stream(stream),
            )
                .into_response())
        }
    }
}

fn range_not_satisfiable(file_size: u64, error: &RangeError) -> Response {
    (
        StatusCode::RANGE_NOT_SATISFIABLE,
        [
            (header::CONTENT_RANGE, format!("bytes */{file_size}")),
            (header::ACCEPT_RANGES, "bytes".to_string()),
        ],
        axum::Json(serde_json::json!({
            "error": error.to_string(),
            "code": "range_not_satisfiable",
        })),
    )
        .into_response()
}
