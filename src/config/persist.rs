//! Configuration persistence using toml_edit to preserve formatting and comments.

use super::{Config, MediaConfig};
use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::DocumentMut;

/// Save the entire config to a TOML file
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let new_content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;
    let new_doc: DocumentMut = new_content
        .parse()
        .with_context(|| "Failed to parse serialized config")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    std::fs::write(path, new_doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

/// Update just the media section of the config file, leaving the rest of the
/// document (comments included) untouched.
pub fn update_media(path: &Path, media: &MediaConfig) -> Result<()> {
    if !path.exists() {
        return save_config(
            path,
            &Config {
                media: media.clone(),
                ..Config::default()
            },
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    let media_toml = toml::to_string(&MediaWrapper {
        media: media.clone(),
    })
    .with_context(|| "Failed to serialize media roots")?;
    let media_doc: DocumentMut = media_toml
        .parse()
        .with_context(|| "Failed to parse serialized media roots")?;

    if let Some(media_item) = media_doc.get("media") {
        doc["media"] = media_item.clone();
    } else {
        doc.remove("media");
    }

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

#[derive(serde::Serialize)]
struct MediaWrapper {
    media: MediaConfig,
}
