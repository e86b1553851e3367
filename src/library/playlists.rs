//! Music playlists.

use carmine_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// Track ids in play order.
    #[serde(default)]
    pub tracks: Vec<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Contents of `playlists.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlists {
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("playlist name is required"));
    }
    Ok(name.to_string())
}

fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

impl Playlists {
    pub fn get(&self, id: &str) -> Result<&Playlist> {
        self.playlists
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found("playlist", id))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found("playlist", id))
    }

    pub fn create(&mut self, name: &str, tracks: Vec<String>) -> Result<Playlist> {
        let now = Utc::now();
        let playlist = Playlist {
            id: Uuid::new_v4().to_string(),
            name: require_name(name)?,
            tracks: dedup_ids(tracks),
            created: now,
            modified: now,
        };
        self.playlists.push(playlist.clone());
        Ok(playlist)
    }

    /// Rename and/or replace the track order.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<&str>,
        tracks: Option<Vec<String>>,
    ) -> Result<Playlist> {
        let name = name.map(require_name).transpose()?;
        let playlist = self.get_mut(id)?;
        if let Some(name) = name {
            playlist.name = name;
        }
        if let Some(tracks) = tracks {
            playlist.tracks = dedup_ids(tracks);
        }
        playlist.modified = Utc::now();
        Ok(playlist.clone())
    }

    /// Append tracks, skipping ones already present.
    pub fn add_tracks(&mut self, id: &str, track_ids: Vec<String>) -> Result<Playlist> {
        let playlist = self.get_mut(id)?;
        for track in track_ids {
            if !playlist.tracks.contains(&track) {
                playlist.tracks.push(track);
            }
        }
        playlist.modified = Utc::now();
        Ok(playlist.clone())
    }

    pub fn remove_tracks(&mut self, id: &str, track_ids: &[String]) -> Result<Playlist> {
        let playlist = self.get_mut(id)?;
        playlist.tracks.retain(|t| !track_ids.contains(t));
        playlist.modified = Utc::now();
        Ok(playlist.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let len_before = self.playlists.len();
        self.playlists.retain(|p| p.id != id);
        if self.playlists.len() == len_before {
            return Err(Error::not_found("playlist", id));
        }
        Ok(())
    }
}
