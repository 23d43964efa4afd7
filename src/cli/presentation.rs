//! CLI presentation: text and JSON rendering of diffs and replication reports.

use crate::diff::DiffResult;
use crate::replicate::ReplicateReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON view of a diff, digests as hex strings.
#[derive(Debug, Serialize)]
struct DiffView {
    dirty: bool,
    additions: Vec<EntryView>,
    changes: Vec<ChangeView>,
    deletions: Vec<EntryView>,
}

#[derive(Debug, Serialize)]
struct EntryView {
    path: String,
    digest: String,
}

#[derive(Debug, Serialize)]
struct ChangeView {
    path: String,
    old_digest: String,
    new_digest: String,
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format a diff as human-readable text: count summary table, then every
/// addition, change (old -> new digest), and deletion (digest being removed).
pub fn format_diff_text(diff: &DiffResult) -> String {
    let mut out = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Additions", "Changes", "Deletions"]);
    table.add_row(vec![
        diff.additions.len().to_string(),
        diff.changes.len().to_string(),
        diff.deletions.len().to_string(),
    ]);
    out.push_str(&format!("{}\n", table));

    if !diff.additions.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Added")));
        for (path, digest) in &diff.additions {
            out.push_str(&format!("  {}\n    {}\n", path, digest));
        }
    }

    if !diff.changes.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Changed")));
        for (path, new_digest) in &diff.changes {
            let old = diff
                .db()
                .get(path)
                .map(|d| d.to_hex())
                .unwrap_or_default();
            out.push_str(&format!("  {}\n    {} -> {}\n", path, old, new_digest));
        }
    }

    if !diff.deletions.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("Deleted")));
        for path in &diff.deletions {
            let old = diff
                .db()
                .get(path)
                .map(|d| d.to_hex())
                .unwrap_or_default();
            out.push_str(&format!("  {}\n    {}\n", path, old));
        }
    }

    if !diff.is_dirty() {
        out.push_str("\nNo changes detected.\n");
    }

    out
}

/// Format a diff as JSON for scripting.
pub fn format_diff_json(diff: &DiffResult) -> Result<String, serde_json::Error> {
    let view = DiffView {
        dirty: diff.is_dirty(),
        additions: diff
            .additions
            .iter()
            .map(|(path, digest)| EntryView {
                path: path.clone(),
                digest: digest.to_hex(),
            })
            .collect(),
        changes: diff
            .changes
            .iter()
            .map(|(path, new_digest)| ChangeView {
                path: path.clone(),
                old_digest: diff
                    .db()
                    .get(path)
                    .map(|d| d.to_hex())
                    .unwrap_or_default(),
                new_digest: new_digest.to_hex(),
            })
            .collect(),
        deletions: diff
            .deletions
            .iter()
            .map(|path| EntryView {
                path: path.clone(),
                digest: diff
                    .db()
                    .get(path)
                    .map(|d| d.to_hex())
                    .unwrap_or_default(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&view)
}

/// Format a replication report as human-readable text.
pub fn format_replicate_report_text(report: &ReplicateReport) -> String {
    let mut out = String::new();

    for path in &report.copied {
        out.push_str(&format!("  copied   {}\n", path));
    }
    for path in &report.updated {
        out.push_str(&format!("  updated  {}\n", path));
    }
    for path in &report.deletion_candidates {
        out.push_str(&format!(
            "  {} {} (tracked in destination, gone from source; left untouched)\n",
            "refusing to delete".yellow(),
            path
        ));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Copied", "Updated", "Deletion candidates"]);
    table.add_row(vec![
        report.copied.len().to_string(),
        report.updated.len().to_string(),
        report.deletion_candidates.len().to_string(),
    ]);
    out.push_str(&format!("{}\n", table));

    out
}
