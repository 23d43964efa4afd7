//! Integration tests for the replication engine.

use replica::diff::{check, diff};
use replica::error::EngineError;
use replica::progress::NoopProgress;
use replica::replicate::replicate;
use replica::review::{review_and_commit, ConfirmPrompt};
use replica::scan::Scanner;
use replica::store::HashDb;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

struct Yes;

impl ConfirmPrompt for Yes {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }
}

fn commit_all(root: &Path) {
    let pending = check(root, &NoopProgress).unwrap();
    review_and_commit(root, pending, &mut Yes).unwrap();
}

/// Source has a new `a.txt` and a changed `b.txt`; destination tracks the old
/// `b.txt` only. After replication the destination holds the source's bytes
/// and its sidecar maps both paths to the source's current digests.
#[test]
fn test_replicates_additions_and_changes() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let (src, dst) = (src_dir.path(), dst_dir.path());

    fs::write(dst.join("b.txt"), "old contents").unwrap();
    commit_all(dst);

    fs::write(src.join("a.txt"), "brand new").unwrap();
    fs::write(src.join("b.txt"), "new contents").unwrap();
    commit_all(src);

    let report = replicate(src, dst, &NoopProgress).unwrap();
    assert_eq!(report.copied, vec!["a.txt".to_string()]);
    assert_eq!(report.updated, vec!["b.txt".to_string()]);
    assert!(report.deletion_candidates.is_empty());

    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "brand new");
    assert_eq!(
        fs::read_to_string(dst.join("b.txt")).unwrap(),
        "new contents"
    );

    let src_db = HashDb::load(src).unwrap();
    let dst_db = HashDb::load(dst).unwrap();
    assert_eq!(dst_db.get("a.txt"), src_db.get("a.txt"));
    assert_eq!(dst_db.get("b.txt"), src_db.get("b.txt"));
}

/// Replication creates missing parent directories for nested additions.
#[test]
fn test_creates_parent_directories() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let (src, dst) = (src_dir.path(), dst_dir.path());

    fs::create_dir_all(src.join("deep").join("nested")).unwrap();
    fs::write(src.join("deep").join("nested").join("f.txt"), "x").unwrap();
    commit_all(src);
    commit_all(dst);

    replicate(src, dst, &NoopProgress).unwrap();
    assert_eq!(
        fs::read_to_string(dst.join("deep").join("nested").join("f.txt")).unwrap(),
        "x"
    );
}

/// Destination tracks `c.txt` which no longer exists in the source: it is
/// reported as a deletion candidate but stays on disk and stays tracked.
#[test]
fn test_deletion_candidates_are_reported_not_applied() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let (src, dst) = (src_dir.path(), dst_dir.path());

    fs::write(dst.join("c.txt"), "precious backup").unwrap();
    commit_all(dst);
    commit_all(src);

    let report = replicate(src, dst, &NoopProgress).unwrap();
    assert_eq!(report.deletion_candidates, vec!["c.txt".to_string()]);

    assert_eq!(
        fs::read_to_string(dst.join("c.txt")).unwrap(),
        "precious backup"
    );
    assert!(HashDb::load(dst).unwrap().contains("c.txt"));
}

/// A dirty source refuses replication with zero mutation on either side.
#[test]
fn test_dirty_source_refuses() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let (src, dst) = (src_dir.path(), dst_dir.path());

    fs::write(src.join("unreviewed.txt"), "not committed").unwrap();
    commit_all(dst);

    let err = replicate(src, dst, &NoopProgress).unwrap_err();
    assert!(matches!(err, EngineError::DirtySource { additions: 1, .. }));

    assert!(!dst.join("unreviewed.txt").exists());
    assert!(HashDb::load(dst).unwrap().is_empty());
}

/// A dirty destination refuses replication and flags likely backup damage.
#[test]
fn test_dirty_destination_refuses() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let (src, dst) = (src_dir.path(), dst_dir.path());

    fs::write(src.join("a.txt"), "clean").unwrap();
    commit_all(src);

    fs::write(dst.join("b.txt"), "tracked").unwrap();
    commit_all(dst);
    fs::write(dst.join("b.txt"), "silently corrupted").unwrap();

    let err = replicate(src, dst, &NoopProgress).unwrap_err();
    assert!(matches!(
        err,
        EngineError::DirtyDestination { changes: 1, .. }
    ));
    assert!(err.to_string().contains("damage to the backup"));

    // Nothing was copied and neither sidecar changed.
    assert!(!dst.join("a.txt").exists());
    assert!(!HashDb::load(dst).unwrap().contains("a.txt"));
}

/// After replication the destination tree converges on the source database:
/// re-scanning the destination against it yields no additions or changes.
#[test]
fn test_replication_convergence() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let (src, dst) = (src_dir.path(), dst_dir.path());

    fs::write(src.join("one.txt"), "1").unwrap();
    fs::create_dir(src.join("d")).unwrap();
    fs::write(src.join("d").join("two.txt"), "2").unwrap();
    commit_all(src);
    commit_all(dst);

    replicate(src, dst, &NoopProgress).unwrap();

    let src_db = HashDb::load(src).unwrap();
    let dst_scan = Scanner::new(dst.to_path_buf()).scan(&NoopProgress).unwrap();
    let against_source = diff(src_db, dst_scan);
    assert!(against_source.additions.is_empty());
    assert!(against_source.changes.is_empty());

    // A second run has nothing left to do.
    let report = replicate(src, dst, &NoopProgress).unwrap();
    assert!(report.copied.is_empty());
    assert!(report.updated.is_empty());
}

/// Files identical on both sides are not rewritten.
#[test]
fn test_equal_digests_are_skipped() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let (src, dst) = (src_dir.path(), dst_dir.path());

    fs::write(src.join("same.txt"), "shared").unwrap();
    fs::write(dst.join("same.txt"), "shared").unwrap();
    commit_all(src);
    commit_all(dst);

    let report = replicate(src, dst, &NoopProgress).unwrap();
    assert!(report.copied.is_empty());
    assert!(report.updated.is_empty());
}
