//! CLI route: single route table and run context. Dispatches to domain modules.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_diff_json, format_diff_text, format_replicate_report_text,
};
use crate::diff::check;
use crate::error::EngineError;
use crate::progress::{IndicatifProgress, NoopProgress, ProgressReporter};
use crate::replicate::replicate;
use crate::review::{review_and_commit, ReviewOutcome, StdinPrompt};

/// How a command ended: text to print on success, or reviewer cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed(String),
    Canceled,
}

/// Runtime context for CLI execution.
pub struct RunContext {
    progress: Box<dyn ProgressReporter>,
}

impl RunContext {
    /// Create run context; `no_progress` swaps the progress bars for no-ops.
    pub fn new(no_progress: bool) -> Self {
        let progress: Box<dyn ProgressReporter> = if no_progress {
            Box::new(NoopProgress)
        } else {
            Box::new(IndicatifProgress)
        };
        Self { progress }
    }

    /// Execute command
    pub fn execute(&self, command: &Commands) -> Result<CommandOutcome, EngineError> {
        match command {
            Commands::Check { directory } => self.handle_check(directory),
            Commands::Status { directory, format } => self.handle_status(directory, format),
            Commands::Replicate { src, dst } => self.handle_replicate(src, dst),
        }
    }

    fn handle_check(&self, directory: &std::path::Path) -> Result<CommandOutcome, EngineError> {
        let diff = check(directory, self.progress.as_ref())?;
        print!("{}", format_diff_text(&diff));
        println!();
        println!("Please review changes, including checking that changed files are ok, before committing.");

        let mut prompt = StdinPrompt;
        match review_and_commit(directory, diff, &mut prompt)? {
            ReviewOutcome::Committed => Ok(CommandOutcome::Completed(
                "Changes committed.".to_string(),
            )),
            ReviewOutcome::Canceled => Ok(CommandOutcome::Canceled),
        }
    }

    fn handle_status(
        &self,
        directory: &std::path::Path,
        format: &str,
    ) -> Result<CommandOutcome, EngineError> {
        let diff = check(directory, self.progress.as_ref())?;
        let output = match format {
            "json" => format_diff_json(&diff).map_err(|e| EngineError::Render(e.to_string()))?,
            "text" => format_diff_text(&diff),
            other => {
                return Err(EngineError::Render(format!(
                    "unknown format {:?} (expected text or json)",
                    other
                )))
            }
        };
        Ok(CommandOutcome::Completed(output))
    }

    fn handle_replicate(
        &self,
        src: &std::path::Path,
        dst: &std::path::Path,
    ) -> Result<CommandOutcome, EngineError> {
        let report = replicate(src, dst, self.progress.as_ref())?;
        Ok(CommandOutcome::Completed(format_replicate_report_text(
            &report,
        )))
    }
}
