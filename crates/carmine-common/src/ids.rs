//! Path-derived media identifiers.
//!
//! A [`MediaId`] is the URL-safe base64 encoding of a file's absolute path.
//! The encoding is reversible, so no registry is needed to map ids back to
//! files: the id *is* the path. Two distinct paths can never share an id,
//! and an id changes whenever the file it names moves.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// URL-safe alphabet, unpadded on encode, padding-agnostic on decode.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Opaque, reversible identifier for a media file (or directory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Derive the id for a path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self(ENGINE.encode(path_bytes(path)))
    }

    /// Borrow the encoded form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back to the exact path that produced this id.
    pub fn decode(&self) -> Result<PathBuf> {
        let bytes = ENGINE
            .decode(self.0.as_bytes())
            .map_err(|e| Error::InvalidId(format!("{}: {}", self.0, e)))?;
        path_from_bytes(bytes)
    }

    /// Decode and check that the path is usable for file access.
    ///
    /// The path must be absolute and free of `..` components so that a
    /// root-prefix check on it is meaningful.
    pub fn resolve(&self) -> Result<PathBuf> {
        let path = self.decode()?;
        if !path.is_absolute() {
            return Err(Error::InvalidId(format!(
                "{} does not name an absolute path",
                self.0
            )));
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(Error::InvalidId(format!(
                "{} contains a parent-directory component",
                self.0
            )));
        }
        Ok(path)
    }
}

impl FromStr for MediaId {
    type Err = Error;

    /// Parse an id received from a client, rejecting anything that is not
    /// valid base64.
    fn from_str(s: &str) -> Result<Self> {
        let id = Self(s.trim().to_string());
        id.decode()?;
        Ok(id)
    }
}

impl From<&Path> for MediaId {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> Result<PathBuf> {
    use std::os::unix::ffi::OsStringExt;
    Ok(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> Result<PathBuf> {
    String::from_utf8(bytes)
        .map(PathBuf::from)
        .map_err(|e| Error::InvalidId(e.to_string()))
}
