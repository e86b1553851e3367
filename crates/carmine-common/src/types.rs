//! Core type definitions for media classification.
//!
//! All enums serialize in lowercase to match what API clients expect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Kind of media file, derived solely from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Video content (served from the videos collection).
    Video,
    /// Audio content (served from the music collection).
    Audio,
    /// Still images (served from the photos collection).
    Image,
}

impl MediaKind {
    /// All kinds, in collection order.
    pub const ALL: [MediaKind; 3] = [MediaKind::Video, MediaKind::Audio, MediaKind::Image];

    /// Name of the collection that holds this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Audio => "music",
            Self::Image => "photos",
        }
    }

    /// Look up a kind by collection name (`videos`, `music`, `photos`).
    pub fn from_collection(name: &str) -> Option<Self> {
        match name {
            "videos" => Some(Self::Video),
            "music" => Some(Self::Audio),
            "photos" => Some(Self::Image),
            _ => None,
        }
    }

    /// Content type used when the extension gives no better answer.
    pub fn fallback_content_type(self) -> &'static str {
        match self {
            Self::Video => "video/mp4",
            Self::Audio => "audio/mpeg",
            Self::Image => "image/jpeg",
        }
    }

    /// Singular noun used in error messages ("video not found: ...").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "track",
            Self::Image => "photo",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Image => write!(f, "image"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "image" => Ok(Self::Image),
            other => Err(Error::validation(format!("unknown media type: {other}"))),
        }
    }
}
