//! Media streaming.
//!
//! Ids are decoded back to paths and served with byte-range support.
//! Every id is checked against the collection's configured roots before
//! the filesystem is touched, so an id can never reach outside them.

mod direct;
mod range;

pub use direct::serve_file;
pub use range::{parse_range, ByteRange, RangeError};

use carmine_common::{Error, MediaId, MediaKind, Result};
use std::path::{Path, PathBuf};

/// Resolve a client-supplied id to a file inside one of `roots`.
///
/// - undecodable, relative or `..`-containing ids: [`Error::InvalidId`]
/// - paths outside every root, missing paths and non-files: [`Error::NotFound`]
pub fn resolve_media(id: &str, kind: MediaKind, roots: &[PathBuf]) -> Result<PathBuf> {
    let media_id: MediaId = id.parse()?;
    let path = media_id.resolve()?;

    if !within_roots(&path, roots) {
        tracing::debug!(
            collection = kind.collection(),
            "Id resolves outside configured roots: {:?}",
            path
        );
        return Err(Error::not_found(kind.noun(), id));
    }

    if !path.is_file() {
        return Err(Error::not_found(kind.noun(), id));
    }

    Ok(path)
}

/// Whether `path` lies under any root (component-wise prefix).
pub fn within_roots(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| path.starts_with(root) && path != root)
}
