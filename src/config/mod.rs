pub mod persist;
mod store;
mod types;

pub use store::SettingsStore;
pub use types::*;

use anyhow::{Context, Result};
use carmine_common::MediaKind;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config, path.parent().unwrap_or(Path::new(".")))?;

    Ok(config)
}

/// Default config file locations, searched in order.
const DEFAULT_PATHS: [&str; 4] = [
    "./carmine.toml",
    "./config.toml",
    "~/.config/carmine/config.toml",
    "/etc/carmine/config.toml",
];

/// Find the config file to use: the explicit path, else the first default
/// location that exists.
pub fn find_config(custom_path: Option<&Path>) -> Option<std::path::PathBuf> {
    if let Some(path) = custom_path {
        return Some(path.to_path_buf());
    }

    DEFAULT_PATHS.iter().find_map(|path_str| {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        path.exists().then(|| path.to_path_buf())
    })
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    match find_config(custom_path) {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

/// Validate configuration
pub fn validate_config(config: &Config, base_dir: &Path) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.host.trim().is_empty() {
        anyhow::bail!("Server host cannot be empty");
    }

    // Missing roots are tolerated; listings simply skip them.
    for kind in MediaKind::ALL {
        for root in config.media.resolved_roots(kind, base_dir) {
            if !root.is_dir() {
                tracing::warn!(
                    collection = kind.collection(),
                    "Media root does not exist: {:?}",
                    root
                );
            }
        }
    }

    Ok(())
}
