//! Carmine-Common: Shared types, identifiers, and utilities.
//!
//! This crate provides common functionality used across carmine:
//!
//! - **Media IDs**: Reversible, URL-safe identifiers derived from file paths
//! - **Core Types**: The [`MediaKind`] enum and per-collection helpers
//! - **Path Utilities**: Extension tables used to classify files
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use carmine_common::{MediaId, MediaKind, Error, Result};
//! use carmine_common::paths::media_kind;
//! use std::path::Path;
//!
//! let id = MediaId::from_path(Path::new("/media/movies/a.mp4"));
//! assert_eq!(id.decode().unwrap(), Path::new("/media/movies/a.mp4"));
//!
//! assert_eq!(media_kind(Path::new("song.FLAC")), Some(MediaKind::Audio));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("video", "abc"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
