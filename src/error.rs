//! Crate error type
//!
//! The per-frame simulation has no error surface; errors only come from
//! loading data (settings, scores, level catalogs) and from constructing a
//! simulation over an unusable catalog.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("level catalog has no levels")]
    EmptyCatalog,

    #[error("level {index} is invalid: {reason}")]
    InvalidLevel { index: u32, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
