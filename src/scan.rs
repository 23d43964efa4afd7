//! Directory scanner: enumerate a tree and hash every regular file.
//!
//! Produces relative POSIX-style paths measured from the tree root so the
//! resulting keys are stable across machines. The sidecar database and its
//! staging artifact are excluded so the tree never tracks its own bookkeeping.

use crate::error::StoreError;
use crate::progress::ProgressReporter;
use crate::store::{SIDECAR_NAME, SIDECAR_STAGING_NAME};
use crate::types::Digest;
use sha1::{Digest as _, Sha1};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Paths physically present under a tree root at scan time, with a freshly
/// computed digest for each. Ephemeral; exists for one scan/diff cycle.
pub type ScanResult = BTreeMap<String, Digest>;

/// Read size for streaming file hashing.
const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// Filesystem scanner for one tree root.
pub struct Scanner {
    root: PathBuf,
}

impl Scanner {
    /// Create a new scanner for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Walk the tree and hash every regular file.
    ///
    /// Two passes: enumerate first so the reporter gets a total, then hash.
    /// Symlinks are not followed. Progress reporting is cosmetic and never
    /// affects the result.
    pub fn scan(&self, progress: &dyn ProgressReporter) -> Result<ScanResult, StoreError> {
        debug!(root = %self.root.display(), "collecting file list");
        let files = self.collect_files()?;

        debug!(files = files.len(), "computing hashes");
        let handle = progress.start("Hashing", files.len() as u64);
        let mut result = ScanResult::new();
        for path in files {
            let key = relative_key(&self.root, &path)?;
            let digest = hash_file(&path).map_err(|source| StoreError::HashFailed {
                path: path.clone(),
                source,
            })?;
            result.insert(key, digest);
            handle.inc(1);
        }
        handle.finish();
        Ok(result)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if is_sidecar_artifact(entry.file_name()) {
                continue;
            }
            files.push(entry.path().to_path_buf());
        }
        Ok(files)
    }
}

/// Whether a file name belongs to the sidecar database or its staging file.
fn is_sidecar_artifact(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.ends_with(SIDECAR_NAME) || name.ends_with(SIDECAR_STAGING_NAME)
}

/// Relative key for a file under `root`: components joined with `/` so keys
/// match the sidecar format on every platform.
fn relative_key(root: &Path, path: &Path) -> Result<String, StoreError> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut key = String::new();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| StoreError::NonUtf8Path(path.to_path_buf()))?;
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(part);
    }
    Ok(key)
}

/// Streaming content digest of one file: fixed-size chunk reads until EOF.
/// The handle is opened, fully streamed, and closed before returning.
pub fn hash_file(path: &Path) -> std::io::Result<Digest> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(Digest::new(hasher.finalize().into()))
}
