//! People tags on photos.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Contents of `photo-tags.json`: photo id to the people in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoTags(BTreeMap<String, Vec<String>>);

impl PhotoTags {
    pub fn people(&self, photo_id: &str) -> Vec<String> {
        self.0.get(photo_id).cloned().unwrap_or_default()
    }

    /// Replace the people tagged in a photo. Names are trimmed and blanks
    /// dropped; an empty result removes the photo's entry.
    pub fn set(&mut self, photo_id: &str, people: Vec<String>) -> Vec<String> {
        let mut cleaned: Vec<String> = Vec::with_capacity(people.len());
        for name in people {
            let name = name.trim();
            if !name.is_empty() && !cleaned.iter().any(|n| n == name) {
                cleaned.push(name.to_string());
            }
        }

        if cleaned.is_empty() {
            self.0.remove(photo_id);
        } else {
            self.0.insert(photo_id.to_string(), cleaned.clone());
        }
        cleaned
    }

    /// Every tagged name, sorted and unique.
    pub fn all_people(&self) -> Vec<String> {
        self.0
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether `name` is tagged in `photo_id`.
    pub fn has_person(&self, photo_id: &str, name: &str) -> bool {
        self.0
            .get(photo_id)
            .is_some_and(|people| people.iter().any(|p| p == name))
    }
}
