//! Photo albums.

use carmine_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub photo_ids: Vec<String>,
    #[serde(default)]
    pub cover_photo_id: Option<String>,
    pub created: DateTime<Utc>,
}

/// Contents of `albums.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Albums {
    #[serde(default)]
    pub albums: Vec<Album>,
}

fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("album name is required"));
    }
    Ok(name.to_string())
}

impl Albums {
    pub fn get(&self, id: &str) -> Result<&Album> {
        self.albums
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found("album", id))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Album> {
        self.albums
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found("album", id))
    }

    pub fn create(&mut self, name: &str) -> Result<Album> {
        let album = Album {
            id: Uuid::new_v4().to_string(),
            name: require_name(name)?,
            photo_ids: Vec::new(),
            cover_photo_id: None,
            created: Utc::now(),
        };
        self.albums.push(album.clone());
        Ok(album)
    }

    /// Rename and/or set the cover. `cover` of `Some(None)` clears it.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<&str>,
        cover: Option<Option<String>>,
    ) -> Result<Album> {
        let name = name.map(require_name).transpose()?;
        let album = self.get_mut(id)?;
        if let Some(name) = name {
            album.name = name;
        }
        if let Some(cover) = cover {
            album.cover_photo_id = cover;
        }
        Ok(album.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let len_before = self.albums.len();
        self.albums.retain(|a| a.id != id);
        if self.albums.len() == len_before {
            return Err(Error::not_found("album", id));
        }
        Ok(())
    }

    /// Append photos, skipping duplicates. The first photo becomes the
    /// cover when none is set.
    pub fn add_photos(&mut self, id: &str, photo_ids: Vec<String>) -> Result<Album> {
        let album = self.get_mut(id)?;
        for photo in photo_ids {
            if !album.photo_ids.contains(&photo) {
                album.photo_ids.push(photo);
            }
        }
        if album.cover_photo_id.is_none() {
            album.cover_photo_id = album.photo_ids.first().cloned();
        }
        Ok(album.clone())
    }

    /// Remove photos. A removed cover is replaced by the first remaining
    /// photo.
    pub fn remove_photos(&mut self, id: &str, photo_ids: &[String]) -> Result<Album> {
        let album = self.get_mut(id)?;
        album.photo_ids.retain(|p| !photo_ids.contains(p));
        if album
            .cover_photo_id
            .as_ref()
            .is_some_and(|cover| photo_ids.contains(cover))
        {
            album.cover_photo_id = album.photo_ids.first().cloned();
        }
        Ok(album.clone())
    }
}
