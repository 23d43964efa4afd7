//! Differ: classify a fresh scan against the recorded database.
//!
//! Every path lands in exactly one of additions, changes, deletions, or is
//! implicitly unchanged. The diff owns the database snapshot it was computed
//! against so the commit fold and replication both work from the same state.

use crate::error::StoreError;
use crate::progress::ProgressReporter;
use crate::scan::{ScanResult, Scanner};
use crate::store::HashDb;
use crate::types::Digest;
use std::path::Path;

/// Classification of a tree against its recorded database state.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Present in the tree, absent from the database.
    pub additions: Vec<(String, Digest)>,
    /// Present in both with a differing digest; carries the new digest.
    pub changes: Vec<(String, Digest)>,
    /// Present in the database, absent from the tree.
    pub deletions: Vec<String>,
    db: HashDb,
}

impl DiffResult {
    /// True iff any addition, change, or deletion is pending review.
    ///
    /// This predicate is the sole safety gate before replication.
    pub fn is_dirty(&self) -> bool {
        !self.additions.is_empty() || !self.changes.is_empty() || !self.deletions.is_empty()
    }

    /// The database snapshot this diff was computed against.
    pub fn db(&self) -> &HashDb {
        &self.db
    }

    /// Take ownership of the database snapshot, discarding the diff.
    pub fn into_db(self) -> HashDb {
        self.db
    }

    /// Fold the diff into its database snapshot: additions and changes are
    /// inserted or overwritten, deletions are removed. Returns the database
    /// reflecting current filesystem state, ready to persist.
    pub fn apply(self) -> HashDb {
        let mut db = self.db;
        for (path, digest) in self.additions {
            db.insert(path, digest);
        }
        for (path, digest) in self.changes {
            db.insert(path, digest);
        }
        for path in &self.deletions {
            db.remove(path);
        }
        db
    }
}

/// Classify every scanned path against the database.
///
/// Runs in time proportional to `|scan| + |db|`: one map lookup per scanned
/// path, one per tracked path. Output collections are sorted by path because
/// both inputs iterate in key order.
pub fn diff(db: HashDb, scan: ScanResult) -> DiffResult {
    let mut additions = Vec::new();
    let mut changes = Vec::new();
    let mut deletions = Vec::new();

    for (path, digest) in &scan {
        match db.get(path) {
            None => additions.push((path.clone(), *digest)),
            Some(recorded) if recorded != digest => changes.push((path.clone(), *digest)),
            Some(_) => {}
        }
    }

    for (path, _) in db.iter() {
        if !scan.contains_key(path) {
            deletions.push(path.clone());
        }
    }

    DiffResult {
        additions,
        changes,
        deletions,
        db,
    }
}

/// Load the database for a root, scan the tree, and diff the two.
///
/// This is the entry point every operation shares; the database is read
/// exactly once and nothing here mutates it.
pub fn check(root: &Path, progress: &dyn ProgressReporter) -> Result<DiffResult, StoreError> {
    let db = HashDb::load(root)?;
    let scan = Scanner::new(root.to_path_buf()).scan(progress)?;
    Ok(diff(db, scan))
}
