//! CLI domain: parse, route, and presentation only.
//! No domain orchestration; the route table dispatches to domain modules.

mod parse;
mod presentation;
mod route;

pub use parse::{Cli, Commands};
pub use presentation::{
    format_diff_json, format_diff_text, format_replicate_report_text,
};
pub use route::{CommandOutcome, RunContext};
