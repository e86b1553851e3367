use carmine_common::MediaKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the web UI build; served with an `index.html` fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,

    /// Where playlists, albums, tags and categories are stored.
    /// Defaults to the directory containing the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            data_dir: None,
        }
    }
}

/// Root directories per collection. Relative entries are resolved against
/// the config file's directory.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MediaConfig {
    #[serde(default)]
    pub videos: Vec<PathBuf>,

    #[serde(default)]
    pub music: Vec<PathBuf>,

    #[serde(default)]
    pub photos: Vec<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            videos: vec![PathBuf::from("media/videos")],
            music: vec![PathBuf::from("media/music")],
            photos: vec![PathBuf::from("media/photos")],
        }
    }
}

impl MediaConfig {
    /// Roots as written in the config for one collection.
    pub fn roots(&self, kind: MediaKind) -> &[PathBuf] {
        match kind {
            MediaKind::Video => &self.videos,
            MediaKind::Audio => &self.music,
            MediaKind::Image => &self.photos,
        }
    }

    pub fn roots_mut(&mut self, kind: MediaKind) -> &mut Vec<PathBuf> {
        match kind {
            MediaKind::Video => &mut self.videos,
            MediaKind::Audio => &mut self.music,
            MediaKind::Image => &mut self.photos,
        }
    }

    /// Roots for one collection made absolute against `base_dir`.
    pub fn resolved_roots(&self, kind: MediaKind, base_dir: &Path) -> Vec<PathBuf> {
        self.roots(kind)
            .iter()
            .map(|root| resolve_root(base_dir, root))
            .collect()
    }
}

/// Make a configured root absolute.
///
/// Existing directories are canonicalized so that ids derived under them
/// carry no `..` or symlinked prefixes; missing ones are joined lexically.
pub fn resolve_root(base_dir: &Path, root: &Path) -> PathBuf {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        base_dir.join(root)
    };
    joined.canonicalize().unwrap_or(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.media.videos, vec![PathBuf::from("media/videos")]);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8096

            [media]
            videos = ["/srv/videos", "/mnt/usb/videos"]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8096);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.media.videos.len(), 2);
        assert!(config.media.music.is_empty());
    }

    #[test]
    fn test_roots_by_kind() {
        let mut media = MediaConfig::default();
        media.roots_mut(MediaKind::Audio).push(PathBuf::from("/extra"));
        assert_eq!(media.roots(MediaKind::Audio).len(), 2);
        assert_eq!(media.roots(MediaKind::Image), &[PathBuf::from("media/photos")]);
    }

    #[test]
    fn test_resolve_root_relative() {
        let base = Path::new("/definitely/not/here");
        assert_eq!(
            resolve_root(base, Path::new("media/videos")),
            PathBuf::from("/definitely/not/here/media/videos")
        );
        assert_eq!(
            resolve_root(base, Path::new("/abs/music")),
            PathBuf::from("/abs/music")
        );
    }

    #[test]
    fn test_resolve_root_canonicalizes_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("videos")).unwrap();
        let resolved = resolve_root(dir.path(), Path::new("./videos/../videos"));
        assert_eq!(resolved, dir.path().join("videos").canonicalize().unwrap());
    }
}
