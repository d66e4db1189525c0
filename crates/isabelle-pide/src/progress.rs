//! Text rendering of per-theory build progress.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::range::LineSpan;

/// Highlight group for theories with failed commands.
pub const ERROR_GROUP: &str = "IsaProgressError";
/// Highlight group for fully processed theories.
pub const DONE_GROUP: &str = "IsaProgressDone";

/// Columns reserved around the bar inside the progress panel.
const BAR_MARGIN: usize = 8;
const FILL: char = '#';
const BLANK: char = ' ';

/// Processing status of one theory as reported by `PIDE/progress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TheoryProgress {
    /// Node name, usually the theory file path.
    pub name: String,
    /// Commands finished without warnings.
    pub finished: u32,
    /// Commands that failed.
    pub failed: u32,
    /// Commands finished with warnings.
    pub warned: u32,
    /// Commands not yet started.
    pub unprocessed: u32,
    /// Commands currently running.
    pub running: u32,
    /// Whether the theory has been consolidated.
    pub consolidated: bool,
    /// Whether processing was cancelled.
    pub canceled: bool,
    /// Whether processing was terminated.
    pub terminated: bool,
    /// Whether the theory has been initialised.
    pub initialized: bool,
}

/// Classification used to style a theory's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TheoryStatus {
    /// At least one command failed.
    Failed,
    /// Every command has been processed.
    Done,
    /// Work remains.
    Running,
}

impl TheoryProgress {
    /// Commands that completed, with or without warnings.
    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.finished as u64 + self.warned as u64
    }

    /// All commands known for the theory.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.processed() + self.unprocessed as u64 + self.running as u64 + self.failed as u64
    }

    /// Failure takes precedence over completion.
    #[must_use]
    pub const fn status(&self) -> TheoryStatus {
        if self.failed > 0 {
            TheoryStatus::Failed
        } else if self.processed() == self.total() {
            TheoryStatus::Done
        } else {
            TheoryStatus::Running
        }
    }

    /// Final path segment of the node name, cut at its first dot.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let file = self.name.rsplit('/').next().unwrap_or_default();
        file.split('.').next().unwrap_or_default()
    }
}

/// Lines and styled spans for the progress panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressReport {
    /// Two lines per theory: name, then bar.
    pub lines: Vec<String>,
    /// Spans of theories with failures.
    pub error_spans: BTreeSet<LineSpan>,
    /// Spans of completed theories.
    pub done_spans: BTreeSet<LineSpan>,
}

/// Renders `entries` for a panel `display_width` columns wide.
///
/// Theory `i` occupies lines `2i` and `2i + 1`. The bar is
/// `display_width - 8` columns between brackets; a theory with no commands
/// renders an empty bar.
#[must_use]
pub fn render_progress(entries: &[TheoryProgress], display_width: usize) -> ProgressReport {
    let bar_width = display_width.saturating_sub(BAR_MARGIN);
    let mut report = ProgressReport {
        lines: Vec::with_capacity(entries.len() * 2),
        ..ProgressReport::default()
    };

    for (index, entry) in entries.iter().enumerate() {
        let start = line_number(index * 2);
        let span = LineSpan::new(start, start.saturating_add(2));

        report.lines.push(entry.display_name().to_owned());
        report
            .lines
            .push(progress_bar(entry.processed(), entry.total(), bar_width));

        match entry.status() {
            TheoryStatus::Failed => {
                report.error_spans.insert(span);
            }
            TheoryStatus::Done => {
                report.done_spans.insert(span);
            }
            TheoryStatus::Running => {}
        }
    }

    report
}

fn progress_bar(processed: u64, total: u64, bar_width: usize) -> String {
    let filled = filled_cells(processed, total, bar_width);
    let mut bar = String::with_capacity(bar_width + 2);
    bar.push('[');
    bar.extend(std::iter::repeat_n(FILL, filled));
    bar.extend(std::iter::repeat_n(BLANK, bar_width - filled));
    bar.push(']');
    bar
}

fn filled_cells(processed: u64, total: u64, bar_width: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let width = u64::try_from(bar_width).unwrap_or(u64::MAX);
    let cells = processed.saturating_mul(width).checked_div(total).unwrap_or(0);
    usize::try_from(cells).map_or(bar_width, |cells| cells.min(bar_width))
}

fn line_number(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
