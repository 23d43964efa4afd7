//! Replication engine: propagate committed changes from a clean source tree
//! to a clean destination tree.
//!
//! Both sides are checked independently against their own databases and the
//! whole operation is refused if either is dirty. Files present in the
//! destination's database but gone from the source are reported as deletion
//! candidates and never touched; removing backup data takes a human.

use crate::diff::check;
use crate::error::EngineError;
use crate::progress::ProgressReporter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What one replication run did, for presentation.
#[derive(Debug, Clone, Default)]
pub struct ReplicateReport {
    /// Paths newly copied to the destination.
    pub copied: Vec<String>,
    /// Paths overwritten on the destination because the source changed.
    pub updated: Vec<String>,
    /// Paths tracked on the destination but absent from the source; reported,
    /// never deleted.
    pub deletion_candidates: Vec<String>,
}

/// Reconcile a clean destination tree with a clean source tree.
///
/// Copies every added or changed file from source to destination, updates the
/// destination's database accordingly, and persists it once after the copy
/// loop. A crash mid-run leaves a destination whose database reflects only
/// fully-copied files; re-running converges.
pub fn replicate(
    src_root: &Path,
    dst_root: &Path,
    progress: &dyn ProgressReporter,
) -> Result<ReplicateReport, EngineError> {
    info!(src = %src_root.display(), "checking source");
    let src_diff = check(src_root, progress)?;
    if src_diff.is_dirty() {
        return Err(EngineError::DirtySource {
            root: src_root.to_path_buf(),
            additions: src_diff.additions.len(),
            changes: src_diff.changes.len(),
            deletions: src_diff.deletions.len(),
        });
    }

    info!(dst = %dst_root.display(), "checking destination");
    let dst_diff = check(dst_root, progress)?;
    if dst_diff.is_dirty() {
        return Err(EngineError::DirtyDestination {
            root: dst_root.to_path_buf(),
            additions: dst_diff.additions.len(),
            changes: dst_diff.changes.len(),
            deletions: dst_diff.deletions.len(),
        });
    }

    let src_db = src_diff.into_db();
    let mut working = dst_diff.into_db();
    let mut report = ReplicateReport::default();

    for (path, src_digest) in src_db.iter() {
        match working.get(path) {
            Some(dst_digest) if dst_digest == src_digest => {}
            Some(_) => {
                debug!(%path, "changed in source tree, replicating");
                copy_file(src_root, dst_root, path)?;
                working.insert(path.clone(), *src_digest);
                report.updated.push(path.clone());
            }
            None => {
                debug!(%path, "added in source tree, replicating");
                let dst_path = tree_path(dst_root, path);
                make_parents(&dst_path)?;
                copy_file(src_root, dst_root, path)?;
                working.insert(path.clone(), *src_digest);
                report.copied.push(path.clone());
            }
        }
    }

    for (path, _) in working.iter() {
        if !src_db.contains(path) {
            warn!(%path, "refusing to automatically delete from backup");
            report.deletion_candidates.push(path.clone());
        }
    }

    working.save(dst_root)?;
    info!(
        copied = report.copied.len(),
        updated = report.updated.len(),
        "replication complete"
    );
    Ok(report)
}

/// Resolve a relative database key to an on-disk path under `root`.
fn tree_path(root: &Path, key: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(key.split('/'));
    path
}

/// Create every missing ancestor directory of a target file path. Idempotent.
fn make_parents(file_path: &Path) -> Result<(), EngineError> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).map_err(|source| EngineError::CopyFailed {
            path: file_path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn copy_file(src_root: &Path, dst_root: &Path, key: &str) -> Result<(), EngineError> {
    let src_path = tree_path(src_root, key);
    let dst_path = tree_path(dst_root, key);
    fs::copy(&src_path, &dst_path).map_err(|source| EngineError::CopyFailed {
        path: src_path,
        source,
    })?;
    Ok(())
}
