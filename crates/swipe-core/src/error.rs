//! Surfaced error types (spec.md §7). `UserDataLoadError` is deliberately
//! not exported: user-data corruption degrades to an empty store and is
//! only ever logged, never returned to a caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutLoadError {
    #[error("failed to read layout file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("layout document contains zero keys")]
    Empty,
}

#[derive(Debug, Error)]
pub enum DictionaryLoadError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub(crate) enum UserDataLoadError {
    #[error("bad magic bytes")]
    BadMagic,
    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),
    #[error("truncated header")]
    TruncatedHeader,
}
