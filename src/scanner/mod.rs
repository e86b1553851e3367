//! Media scanner.
//!
//! Walks root directories recursively, classifies files by extension and
//! produces one [`MediaRecord`] per discovered media file. Nothing is
//! cached: every listing rescans the filesystem.
//!
//! Unreadable entries, failed stats and symlink loops are logged and
//! skipped, so a scan always terminates and returns whatever it could read.

use carmine_common::paths::{content_type, is_hidden, media_kind};
use carmine_common::{Error, MediaId, MediaKind, Result};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One discovered media file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: MediaId,
    pub name: String,
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_path")]
    pub relative_path: PathBuf,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub mime_type: &'static str,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

/// Result of re-stat-ing a single file by id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub id: MediaId,
    pub name: String,
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Track details shown in music listings.
///
/// Tags are not decoded; everything is derived from the file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl TrackMetadata {
    pub fn from_path(path: &Path) -> Self {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            title,
            artist: "Unknown Artist".to_string(),
            album: "Unknown Album".to_string(),
        }
    }
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn modified_time(metadata: &Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH)
}

/// Walk `root` and return every media file under it, optionally restricted
/// to one kind.
///
/// A missing root yields an empty list. Hidden entries (dot-prefixed) are
/// skipped and hidden directories are never entered; the root itself is
/// exempt. Results are unordered.
pub fn scan_directory(root: &Path, filter: Option<MediaKind>) -> Vec<MediaRecord> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(root),
            Err(e) => {
                warn!("Cannot resolve relative root {:?}: {}", root, e);
                return Vec::new();
            }
        }
    };

    if !root.is_dir() {
        warn!("Media root does not exist: {:?}", root);
        return Vec::new();
    }

    debug!("Scanning directory: {:?}", root);
    let mut records = Vec::new();

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if let Some(ancestor) = e.loop_ancestor() {
                    warn!(
                        "Skipping symlink loop at {:?} (points back to {:?})",
                        e.path(),
                        ancestor
                    );
                } else {
                    warn!("Skipping unreadable entry: {}", e);
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(kind) = media_kind(path) else {
            continue;
        };
        if filter.is_some_and(|f| f != kind) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to stat {:?}: {}", path, e);
                continue;
            }
        };

        let modified = modified_time(&metadata);
        let created = metadata
            .created()
            .map(DateTime::<Utc>::from)
            .unwrap_or(modified);

        records.push(MediaRecord {
            id: MediaId::from_path(path),
            name: file_name(path),
            path: path.to_path_buf(),
            relative_path: path.strip_prefix(&root).unwrap_or(path).to_path_buf(),
            kind,
            mime_type: content_type(path).unwrap_or(kind.fallback_content_type()),
            size: metadata.len(),
            modified,
            created,
        });
    }

    debug!("Found {} media files under {:?}", records.len(), root);
    records
}

/// Scan several roots on the blocking pool and concatenate the results.
pub async fn scan_roots(roots: Vec<PathBuf>, filter: Option<MediaKind>) -> Result<Vec<MediaRecord>> {
    tokio::task::spawn_blocking(move || {
        roots
            .iter()
            .flat_map(|root| scan_directory(root, filter))
            .collect()
    })
    .await
    .map_err(|e| Error::internal(format!("scan task failed: {e}")))
}

/// Count matching files under several roots.
pub async fn count_roots(roots: Vec<PathBuf>, kind: MediaKind) -> Result<usize> {
    let records = scan_roots(roots, Some(kind)).await?;
    Ok(records.len())
}

/// Scan every collection and log a summary. Used by the CLI and the
/// settings rescan endpoint.
pub async fn scan_summary(roots: [(MediaKind, Vec<PathBuf>); 3]) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();
    for (kind, roots) in roots {
        let count = count_roots(roots, kind).await?;
        match kind {
            MediaKind::Video => summary.videos = count,
            MediaKind::Audio => summary.music = count,
            MediaKind::Image => summary.photos = count,
        }
    }
    summary.total = summary.videos + summary.music + summary.photos;
    info!(
        videos = summary.videos,
        music = summary.music,
        photos = summary.photos,
        "Scan complete"
    );
    Ok(summary)
}

/// Per-collection file counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub videos: usize,
    pub music: usize,
    pub photos: usize,
    pub total: usize,
}

/// Sort records the way each collection lists them: photos newest first,
/// everything else by name ignoring case.
pub fn sort_for_collection(records: &mut [MediaRecord], kind: MediaKind) {
    match kind {
        MediaKind::Image => records.sort_by(newest_first),
        MediaKind::Video | MediaKind::Audio => records.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
}

pub fn newest_first(a: &MediaRecord, b: &MediaRecord) -> Ordering {
    b.modified.cmp(&a.modified)
}

/// Stat a single file for the detail endpoints.
pub fn media_info(path: &Path) -> Result<MediaInfo> {
    let metadata = std::fs::metadata(path)?;
    Ok(MediaInfo {
        id: MediaId::from_path(path),
        name: file_name(path),
        path: path.to_path_buf(),
        kind: media_kind(path),
        size: metadata.len(),
        modified: modified_time(&metadata),
    })
}
