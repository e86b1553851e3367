//! Runtime settings store.
//!
//! Holds the live [`Config`] behind a lock and writes changes back to the
//! config file. Handlers take snapshots (or resolved root lists) and pass
//! them to the scanner explicitly; nothing reads configuration ambiently.

use super::{persist, resolve_root, Config, MediaConfig, ServerConfig};
use carmine_common::{Error, MediaKind, Result};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

pub struct SettingsStore {
    config: RwLock<Config>,
    /// Config file to persist to; `None` keeps changes in memory only.
    path: Option<PathBuf>,
    /// Base for relative media roots.
    base_dir: PathBuf,
}

impl SettingsStore {
    /// Create a store. Relative roots resolve against the config file's
    /// directory, or the working directory when there is no file.
    pub fn new(config: Config, path: Option<PathBuf>) -> Self {
        let base_dir = path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let base_dir = if base_dir.is_absolute() {
            base_dir
        } else {
            std::env::current_dir().unwrap_or_default().join(base_dir)
        };
        Self::with_base_dir(config, path, base_dir)
    }

    pub fn with_base_dir(config: Config, path: Option<PathBuf>, base_dir: PathBuf) -> Self {
        Self {
            config: RwLock::new(config),
            path,
            base_dir,
        }
    }

    pub fn snapshot(&self) -> Config {
        self.config.read().clone()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Absolute roots for one collection.
    pub fn roots(&self, kind: MediaKind) -> Vec<PathBuf> {
        self.config
            .read()
            .media
            .resolved_roots(kind, &self.base_dir)
    }

    /// Directory for the JSON library stores.
    pub fn data_dir(&self) -> PathBuf {
        match self.config.read().server.data_dir.as_deref() {
            Some(dir) => resolve_root(&self.base_dir, dir),
            None => self.base_dir.clone(),
        }
    }

    /// Replace the server and/or media sections.
    pub fn replace(
        &self,
        server: Option<ServerConfig>,
        media: Option<MediaConfig>,
    ) -> Result<Config> {
        if let Some(ref server) = server {
            if server.port == 0 {
                return Err(Error::validation("server port cannot be 0"));
            }
            if server.host.trim().is_empty() {
                return Err(Error::validation("server host cannot be empty"));
            }
        }

        let mut config = self.config.write();
        if let Some(server) = server {
            config.server = server;
        }
        if let Some(media) = media {
            config.media = media;
        }

        if let Some(ref path) = self.path {
            if let Err(e) = persist::save_config(path, &config) {
                tracing::error!("Failed to persist settings: {:#}", e);
            }
        }

        Ok(config.clone())
    }

    /// Change the listen address in memory without touching the file.
    pub fn override_listen(&self, host: Option<String>, port: Option<u16>) -> Result<()> {
        if port == Some(0) {
            return Err(Error::validation("server port cannot be 0"));
        }
        let mut config = self.config.write();
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }
        Ok(())
    }

    /// Add a root directory to a collection. The directory must exist.
    /// Adding a root that is already configured is a no-op.
    pub fn add_root(&self, kind: MediaKind, root: PathBuf) -> Result<Config> {
        if root.as_os_str().is_empty() {
            return Err(Error::validation("path is required"));
        }
        if !resolve_root(&self.base_dir, &root).is_dir() {
            return Err(Error::validation(format!(
                "directory does not exist: {}",
                root.display()
            )));
        }

        let mut config = self.config.write();
        let roots = config.media.roots_mut(kind);
        if !roots.contains(&root) {
            tracing::info!(collection = kind.collection(), "Adding media root {:?}", root);
            roots.push(root);
            self.persist_media(&config.media);
        }

        Ok(config.clone())
    }

    /// Remove a root directory from a collection if present.
    pub fn remove_root(&self, kind: MediaKind, root: &Path) -> Config {
        let mut config = self.config.write();
        let roots = config.media.roots_mut(kind);
        let len_before = roots.len();
        roots.retain(|r| r != root);
        if roots.len() != len_before {
            tracing::info!(collection = kind.collection(), "Removed media root {:?}", root);
            self.persist_media(&config.media);
        }
        config.clone()
    }

    fn persist_media(&self, media: &MediaConfig) {
        if let Some(ref path) = self.path {
            if let Err(e) = persist::update_media(path, media) {
                tracing::error!("Failed to persist media roots: {:#}", e);
            }
        }
    }
}
