//! Error types for tree tracking and replication.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-level errors: sidecar database parsing and filesystem access
/// during a scan.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed database line {line} in {file:?}: missing tab separator")]
    MalformedLine { file: PathBuf, line: usize },

    #[error("malformed digest on database line {line} in {file:?}")]
    MalformedDigest { file: PathBuf, line: usize },

    #[error("path {0:?} is not valid UTF-8 and cannot be tracked")]
    NonUtf8Path(PathBuf),

    #[error("failed to hash {path:?}: {source}")]
    HashFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Operation-level errors for replication and CLI dispatch.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "source tree {root:?} is dirty ({additions} additions, {changes} changes, \
         {deletions} deletions); run an integrity check and review changes first"
    )]
    DirtySource {
        root: PathBuf,
        additions: usize,
        changes: usize,
        deletions: usize,
    },

    #[error(
        "destination tree {root:?} is dirty ({additions} additions, {changes} changes, \
         {deletions} deletions); this likely indicates damage to the backup"
    )]
    DirtyDestination {
        root: PathBuf,
        additions: usize,
        changes: usize,
        deletions: usize,
    },

    #[error("failed to copy {path:?}: {source}")]
    CopyFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render output: {0}")]
    Render(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
