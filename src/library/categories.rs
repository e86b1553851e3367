//! Video categories and the TV-show grouping built on them.

use carmine_common::{Error, MediaId, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::scanner::MediaRecord;

/// Pseudo-category for videos without a (known) assignment.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Category whose videos are grouped into shows.
pub const TV_SHOWS: &str = "tvshows";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl Category {
    fn new(id: &str, name: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Contents of `video-categories.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCategories {
    pub categories: Vec<Category>,
    /// Video id to category id.
    #[serde(default)]
    pub video_assignments: BTreeMap<String, String>,
}

impl Default for VideoCategories {
    fn default() -> Self {
        Self {
            categories: vec![
                Category::new("movies", "Movies", "film"),
                Category::new(TV_SHOWS, "TV Shows", "tv"),
                Category::new("homevideos", "Home Videos", "video"),
            ],
            video_assignments: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    #[serde(flatten)]
    pub category: Category,
    pub count: usize,
}

impl VideoCategories {
    fn is_known(&self, category_id: &str) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }

    /// Category of a video. Assignments to categories that no longer exist
    /// read as unassigned.
    pub fn category_of(&self, video_id: &str) -> Option<&str> {
        self.video_assignments
            .get(video_id)
            .map(String::as_str)
            .filter(|c| self.is_known(c))
    }

    /// Assign a video; `None` or `"uncategorized"` clears the assignment.
    pub fn assign(&mut self, video_id: &str, category_id: Option<&str>) -> Result<Option<String>> {
        match category_id.filter(|c| *c != UNCATEGORIZED) {
            None => {
                self.video_assignments.remove(video_id);
                Ok(None)
            }
            Some(category) => {
                if !self.is_known(category) {
                    return Err(Error::validation(format!("unknown category: {category}")));
                }
                self.video_assignments
                    .insert(video_id.to_string(), category.to_string());
                Ok(Some(category.to_string()))
            }
        }
    }

    /// Categories with the number of `videos` in each, plus an
    /// `uncategorized` entry when any video lacks a category.
    pub fn counts(&self, videos: &[MediaRecord]) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut uncategorized = 0;
        for video in videos {
            match self.category_of(video.id.as_str()) {
                Some(category) => *counts.entry(category).or_default() += 1,
                None => uncategorized += 1,
            }
        }

        let mut out: Vec<CategoryCount> = self
            .categories
            .iter()
            .map(|c| CategoryCount {
                category: c.clone(),
                count: counts.get(c.id.as_str()).copied().unwrap_or(0),
            })
            .collect();

        if uncategorized > 0 {
            out.push(CategoryCount {
                category: Category::new(UNCATEGORIZED, "Uncategorized", "folder"),
                count: uncategorized,
            });
        }
        out
    }

    /// Videos in one category, newest first.
    pub fn filter(&self, category_id: &str, videos: Vec<MediaRecord>) -> Vec<MediaRecord> {
        let mut matching: Vec<MediaRecord> = videos
            .into_iter()
            .filter(|v| match self.category_of(v.id.as_str()) {
                Some(c) => c == category_id,
                None => category_id == UNCATEGORIZED,
            })
            .collect();
        matching.sort_by(crate::scanner::newest_first);
        matching
    }
}

/// A folder of videos assigned to the TV-shows category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShow {
    /// Id of the show's directory.
    pub id: MediaId,
    pub name: String,
    pub path: String,
    pub episode_count: usize,
    pub cover_video_id: MediaId,
}

/// An episode: the video record plus its position in the show.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(flatten)]
    pub video: MediaRecord,
    pub episode_number: usize,
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Group TV-show videos by parent directory.
pub fn tv_shows(categories: &VideoCategories, videos: Vec<MediaRecord>) -> Vec<TvShow> {
    let mut groups: BTreeMap<PathBuf, Vec<MediaRecord>> = BTreeMap::new();
    for video in videos {
        if categories.category_of(video.id.as_str()) == Some(TV_SHOWS) {
            groups.entry(parent_dir(&video.path)).or_default().push(video);
        }
    }

    let mut shows: Vec<TvShow> = groups
        .into_iter()
        .filter_map(|(dir, mut episodes)| {
            episodes.sort_by(|a, b| natural_cmp(&a.name, &b.name));
            let cover = episodes.first()?.id.clone();
            Some(TvShow {
                id: MediaId::from_path(&dir),
                name: dir_name(&dir),
                path: dir.to_string_lossy().into_owned(),
                episode_count: episodes.len(),
                cover_video_id: cover,
            })
        })
        .collect();

    shows.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    shows
}

/// Episodes of the show living in `show_dir`, naturally ordered and
/// numbered from 1.
pub fn episodes(
    categories: &VideoCategories,
    show_dir: &Path,
    videos: Vec<MediaRecord>,
) -> Vec<Episode> {
    let mut matching: Vec<MediaRecord> = videos
        .into_iter()
        .filter(|v| {
            categories.category_of(v.id.as_str()) == Some(TV_SHOWS)
                && parent_dir(&v.path) == show_dir
        })
        .collect();
    matching.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    matching
        .into_iter()
        .enumerate()
        .map(|(i, video)| Episode {
            video,
            episode_number: i + 1,
        })
        .collect()
}

/// Case-insensitive comparison treating digit runs as numbers, so that
/// `E2` sorts before `E10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_number(&mut left);
                let rn = take_number(&mut right);
                let ord = compare_digits(&ln, &rn);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

/// Compare digit strings by numeric value without overflow.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
