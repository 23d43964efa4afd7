//! Sidecar hash database: persistence for a tracked tree.
//!
//! Each tracked tree keeps a single database file at `root/.sha1sums`, one
//! `digest<TAB>relative_path` line per tracked file. The database is loaded
//! once at the start of an operation and written at most once at the end.
//! Saving goes through `root/.sha1sums_new` and renames it over the sidecar,
//! so the on-disk database is always a fully-formed snapshot; a crash can at
//! worst strand a staging file, which the scanner ignores.

use crate::error::StoreError;
use crate::types::Digest;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the sidecar database inside a tree root.
pub const SIDECAR_NAME: &str = ".sha1sums";

/// File name of the in-progress staging sidecar, renamed over [`SIDECAR_NAME`]
/// on save.
pub const SIDECAR_STAGING_NAME: &str = ".sha1sums_new";

/// Persisted mapping from relative path to content digest for one tree root.
///
/// Keys are POSIX-style paths relative to the root, stable across machines.
/// `BTreeMap` keeps the persisted order stable so sidecar rewrites diff
/// cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashDb {
    entries: BTreeMap<String, Digest>,
}

impl HashDb {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the sidecar database file for a tree root.
    pub fn sidecar_path(root: &Path) -> PathBuf {
        root.join(SIDECAR_NAME)
    }

    /// Path of the staging file used while saving.
    pub fn staging_path(root: &Path) -> PathBuf {
        root.join(SIDECAR_STAGING_NAME)
    }

    /// Load the database for a tree root.
    ///
    /// A missing sidecar is a cold start, not an error: the tree has never
    /// been tracked, so every file will show up as an addition. A line
    /// without a tab separator or with an undecodable digest is fatal.
    /// Splits on the first tab only, so a path containing tabs after the
    /// delimiter survives parsing.
    pub fn load(root: &Path) -> Result<Self, StoreError> {
        let sidecar = Self::sidecar_path(root);
        if !sidecar.exists() {
            warn!(sidecar = %sidecar.display(), "no checksum database found, assuming zero known files");
            return Ok(Self::new());
        }

        debug!(sidecar = %sidecar.display(), "reading checksum database");
        let contents = fs::read_to_string(&sidecar)?;
        let mut entries = BTreeMap::new();
        for (index, line) in contents.lines().enumerate() {
            let (digest_hex, path) =
                line.split_once('\t')
                    .ok_or_else(|| StoreError::MalformedLine {
                        file: sidecar.clone(),
                        line: index + 1,
                    })?;
            let digest =
                Digest::from_hex(digest_hex).map_err(|_| StoreError::MalformedDigest {
                    file: sidecar.clone(),
                    line: index + 1,
                })?;
            entries.insert(path.to_string(), digest);
        }
        Ok(Self { entries })
    }

    /// Save the database to the tree root's sidecar file.
    ///
    /// Writes the full snapshot to the staging file, then renames it over
    /// the sidecar so readers never observe a half-written database.
    pub fn save(&self, root: &Path) -> Result<(), StoreError> {
        let staging = Self::staging_path(root);
        let sidecar = Self::sidecar_path(root);

        {
            let file = fs::File::create(&staging)?;
            let mut writer = BufWriter::new(file);
            for (path, digest) in &self.entries {
                writeln!(writer, "{}\t{}", digest.to_hex(), path)?;
            }
            writer.flush()?;
        }
        fs::rename(&staging, &sidecar)?;
        debug!(sidecar = %sidecar.display(), entries = self.entries.len(), "checksum database written");
        Ok(())
    }

    /// Look up the recorded digest for a relative path.
    pub fn get(&self, path: &str) -> Option<&Digest> {
        self.entries.get(path)
    }

    /// Whether a relative path is tracked.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Insert or overwrite the digest for a relative path.
    pub fn insert(&mut self, path: String, digest: Digest) {
        self.entries.insert(path, digest);
    }

    /// Remove a relative path from the database.
    pub fn remove(&mut self, path: &str) {
        self.entries.remove(path);
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Digest)> {
        self.entries.iter()
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the database tracks no paths.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
