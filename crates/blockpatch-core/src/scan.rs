//! Line scanner that swaps the first block after a header for replacement text.
//!
//! The scan is a four-state machine driven purely by line matches:
//!
//! ```text
//! Scanning --header--> HeaderFound --open--> InsideRemovedBlock --close--> Replaced
//! ```
//!
//! Lines are never parsed as HTML. Only the first block after a header is
//! replaced; everything after that point is copied verbatim.

use crate::markers::Markers;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    HeaderFound,
    InsideRemovedBlock,
    Replaced,
}

/// What a scan did to its input. Line numbers are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub header_found: bool,
    pub header_line: Option<usize>,
    pub block_start_line: Option<usize>,
    pub block_end_line: Option<usize>,
    pub blocks_replaced: usize,
    pub lines_removed: usize,
    /// The closing delimiter never appeared; every line after the opening
    /// delimiter was dropped.
    pub unterminated: bool,
}

#[derive(Debug, Clone)]
pub struct Scan<'a> {
    pub lines: Vec<&'a str>,
    pub outcome: ScanOutcome,
}

impl Scan<'_> {
    pub fn to_text(&self) -> String {
        self.lines.concat()
    }
}

/// Splits `text` into lines that keep their terminators, so concatenating the
/// result gives back `text` unchanged.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

pub fn replace_block<'a>(lines: &[&'a str], markers: &Markers, replacement: &'a str) -> Scan<'a> {
    let mut out = Vec::with_capacity(lines.len());
    let mut outcome = ScanOutcome::default();
    let mut state = ScanState::Scanning;

    for (idx, &line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        match state {
            ScanState::Replaced => {
                out.push(line);
            }
            ScanState::InsideRemovedBlock => {
                outcome.lines_removed += 1;
                if markers.close.is_match(line) {
                    tracing::debug!(line = line_no, "closing delimiter");
                    outcome.block_end_line = Some(line_no);
                    state = ScanState::Replaced;
                }
            }
            ScanState::Scanning | ScanState::HeaderFound => {
                if markers.header.is_match(line) {
                    tracing::debug!(line = line_no, "header marker");
                    outcome.header_found = true;
                    outcome.header_line = Some(line_no);
                    state = ScanState::HeaderFound;
                    out.push(line);
                } else if state == ScanState::HeaderFound && markers.open.is_match(line) {
                    tracing::debug!(line = line_no, "opening delimiter");
                    out.push(replacement);
                    outcome.block_start_line = Some(line_no);
                    outcome.blocks_replaced = 1;
                    outcome.lines_removed = 1;
                    state = ScanState::InsideRemovedBlock;
                } else {
                    out.push(line);
                }
            }
        }
    }

    outcome.unterminated = state == ScanState::InsideRemovedBlock;
    Scan {
        lines: out,
        outcome,
    }
}

/// Text-level wrapper around [`replace_block`].
pub fn replace_block_in_text(
    text: &str,
    markers: &Markers,
    replacement: &str,
) -> (String, ScanOutcome) {
    let lines = split_lines(text);
    let scan = replace_block(&lines, markers, replacement);
    (scan.to_text(), scan.outcome)
}
