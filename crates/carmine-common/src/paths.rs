//! Path utilities for classifying files by extension.
//!
//! The tables here are the single source of truth for what the scanner
//! considers media. Matching is case-insensitive on the final extension.

use std::path::Path;

use crate::types::MediaKind;

/// Supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v"];

/// Supported audio file extensions.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "aac", "ogg", "m4a", "wma"];

/// Supported image file extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Classify a path by its extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use carmine_common::{paths::media_kind, MediaKind};
///
/// assert_eq!(media_kind(Path::new("movie.MKV")), Some(MediaKind::Video));
/// assert_eq!(media_kind(Path::new("notes.txt")), None);
/// ```
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    MediaKind::ALL
        .into_iter()
        .find(|kind| extensions(*kind).contains(&ext.as_str()))
}

/// Extensions recognised for a media kind.
#[must_use]
pub fn extensions(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Video => VIDEO_EXTENSIONS,
        MediaKind::Audio => AUDIO_EXTENSIONS,
        MediaKind::Image => IMAGE_EXTENSIONS,
    }
}

/// Best-effort MIME type for a path, `None` when the extension is unknown.
pub fn content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "wma" => "audio/x-ms-wma",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

/// Whether a file or directory name is hidden (dot-prefixed).
pub fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}
