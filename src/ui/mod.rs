//! Terminal output for the command-line runner.
//!
//! Colored status lines, a spinner while requests are in flight, and a short
//! summary of an [`AssembledOutput`].

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{AssembledOutput, CauseListAttempt, QueryResults};

/// Widest a summary line is allowed to get
const SUMMARY_WIDTH: usize = 96;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Download,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Download => "↓",
        Status::Search => "🔍",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Download => println!("{} {}", icon.magenta(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print what a run found, stage by stage.
pub fn print_summary(output: &AssembledOutput) {
    print_section(&output.query.label());

    for (status, line) in summary_lines(output) {
        print_status(status, &truncate_with_ellipsis(&line, SUMMARY_WIDTH));
    }
}

/// Summary lines of a run, without styling
pub fn summary_lines(output: &AssembledOutput) -> Vec<(Status, String)> {
    let mut lines = Vec::new();

    match &output.results {
        Some(QueryResults::CaseRecord(record)) if record.found => {
            let title = record
                .info
                .as_ref()
                .and_then(|info| info.title.as_deref())
                .unwrap_or("untitled case page");
            lines.push((Status::Success, format!("Found: {}", title)));
            let pdfs = record.pdf_links().len();
            if pdfs > 0 {
                lines.push((Status::Download, format!("{} PDF link(s)", pdfs)));
            }
            if record.info.as_ref().is_some_and(|i| i.page_mentions_listing) {
                lines.push((Status::Info, "Page mentions a listing".to_string()));
            }
        }
        Some(QueryResults::CaseRecord(record)) => {
            lines.push((Status::Error, format!("No case found for {}", record.cnr)));
        }
        Some(QueryResults::CaseSearch(result)) => {
            let count = result.results.as_ref().map_or(0, Vec::len);
            if result.found {
                lines.push((Status::Success, format!("{} matching link(s)", count)));
                for link in result.results.iter().flatten() {
                    lines.push((Status::Search, format!("{} -> {}", link.text, link.href)));
                }
            } else {
                lines.push((Status::Error, "No matching case links".to_string()));
            }
        }
        Some(QueryResults::CauseList(attempt)) => {
            lines.push(attempt_line("Cause list", attempt));
        }
        Some(QueryResults::Passthrough(_)) => {
            lines.push((Status::Success, "Case details returned as JSON".to_string()));
        }
        None => lines.push((Status::Warning, "No results".to_string())),
    }

    if let Some(attempt) = &output.cause_list_attempt {
        lines.push(attempt_line("Listing check", attempt));
    }

    match &output.found_in_causelist {
        Some(Some(found)) => lines.push((
            Status::Success,
            format!("Listed at serial {}: {}", found.serial, found.line),
        )),
        Some(None) => lines.push((Status::Warning, "Not found in the cause list".to_string())),
        None => {}
    }

    if let Some(attempt) = &output.extras.cause_list {
        lines.push(attempt_line("Cause list download", attempt));
    }

    lines
}

/// First summary line, the outcome of the main query
pub fn headline(output: &AssembledOutput) -> (Status, String) {
    summary_lines(output)
        .into_iter()
        .next()
        .unwrap_or((Status::Warning, "No results".to_string()))
}

fn attempt_line(stage: &str, attempt: &CauseListAttempt) -> (Status, String) {
    if attempt.ok {
        (
            Status::Success,
            format!("{}: {} PDF(s)", stage, attempt.pdfs().len()),
        )
    } else {
        (
            Status::Warning,
            format!(
                "{}: {}",
                stage,
                attempt.reason.as_deref().unwrap_or("unavailable")
            ),
        )
    }
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut end_idx = 0;
    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width - 3 {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated)
}

/// A loading spinner with a message.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(spinner_style("{spinner:.cyan} {msg}").tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for quiet or piped runs.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb
            .set_style(spinner_style("{spinner:.green} {msg}").tick_chars("✓✓"));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb
            .set_style(spinner_style("{spinner:.red} {msg}").tick_chars("✗✗"));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Finish on the outcome of a run.
    pub fn finish_with_output(&self, output: &AssembledOutput) {
        let (status, line) = headline(output);
        match status {
            Status::Success => self.finish_with_success(&line),
            _ => self.finish_with_error(&line),
        }
    }
}

fn spinner_style(template: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
}
