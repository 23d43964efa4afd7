//! Review/commit workflow: a human decision gates every database update.
//!
//! The workflow never mutates anything until the reviewer accepts; a decline
//! leaves the sidecar byte-for-byte untouched. Confirmation is an injected
//! capability so tests can script the answer.

use crate::diff::DiffResult;
use crate::error::StoreError;
use crate::store::HashDb;
use std::io;
use std::path::Path;
use tracing::info;

/// Synchronous yes/no confirmation capability.
pub trait ConfirmPrompt {
    /// Present the prompt and return the reviewer's decision.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Terminal state of one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Reviewer accepted; the database now reflects filesystem state.
    Committed,
    /// Reviewer declined; nothing was mutated.
    Canceled,
}

/// Production prompt: reads one line from standard input and accepts iff it
/// starts with `y` or `Y`. Anything else, including EOF, cancels.
pub struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        use std::io::Write;
        print!("{} [y/n]? ", prompt);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(answer.starts_with('y') || answer.starts_with('Y'))
    }
}

/// Ask the reviewer to commit the diff; on acceptance fold it into the
/// database and persist.
///
/// The caller is responsible for rendering the diff before calling this, so
/// the decision is always made against what was shown.
pub fn review_and_commit(
    root: &Path,
    diff: DiffResult,
    prompt: &mut dyn ConfirmPrompt,
) -> Result<ReviewOutcome, StoreError> {
    let accepted = prompt.confirm("Commit changes")?;
    if !accepted {
        info!(root = %root.display(), "review canceled, database untouched");
        return Ok(ReviewOutcome::Canceled);
    }

    let db: HashDb = diff.apply();
    db.save(root)?;
    info!(root = %root.display(), entries = db.len(), "changes committed");
    Ok(ReviewOutcome::Committed)
}
