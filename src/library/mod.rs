//! User-curated data layered over the media files: playlists, albums,
//! people tags and video categories.
//!
//! Each collection is one JSON document in the data directory. Entries
//! refer to media only by id, so moving or deleting a file leaves stale
//! ids behind; readers filter them out, nothing prunes them.

mod albums;
mod categories;
mod playlists;
mod store;
mod tags;

pub use albums::{Album, Albums};
pub use categories::{
    episodes, natural_cmp, tv_shows, Category, CategoryCount, Episode, TvShow, VideoCategories,
    TV_SHOWS, UNCATEGORIZED,
};
pub use playlists::{Playlist, Playlists};
pub use store::JsonStore;
pub use tags::PhotoTags;

use std::path::Path;

pub const PLAYLISTS_FILE: &str = "playlists.json";
pub const ALBUMS_FILE: &str = "albums.json";
pub const PHOTO_TAGS_FILE: &str = "photo-tags.json";
pub const VIDEO_CATEGORIES_FILE: &str = "video-categories.json";

pub struct Library {
    pub playlists: JsonStore<Playlists>,
    pub albums: JsonStore<Albums>,
    pub tags: JsonStore<PhotoTags>,
    pub categories: JsonStore<VideoCategories>,
}

impl Library {
    /// Open (or lazily create) every store under `data_dir`.
    pub fn open(data_dir: &Path) -> Self {
        tracing::debug!("Opening library stores in {:?}", data_dir);
        Self {
            playlists: JsonStore::open(data_dir.join(PLAYLISTS_FILE)),
            albums: JsonStore::open(data_dir.join(ALBUMS_FILE)),
            tags: JsonStore::open(data_dir.join(PHOTO_TAGS_FILE)),
            categories: JsonStore::open(data_dir.join(VIDEO_CATEGORIES_FILE)),
        }
    }
}
