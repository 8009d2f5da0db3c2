use crate::config::PatchRequest;
use crate::scan::{ScanOutcome, replace_block_in_text, split_lines};
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOptions {
    /// Build the output and report, but never write the file.
    pub dry_run: bool,
    /// Refuse to write unless exactly one properly closed block was replaced.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: ScanOutcome,
    /// The patched text differs from the file contents.
    pub changed: bool,
    pub written: bool,
}

/// Patches `text` in memory without touching the filesystem.
pub fn patch_text(
    request: &PatchRequest,
    text: &str,
    options: PatchOptions,
) -> Result<(String, ScanOutcome)> {
    let (out, outcome) = replace_block_in_text(text, &request.markers, &request.replacement);

    if !outcome.header_found {
        tracing::warn!(
            path = %request.path.display(),
            header = request.markers.header.as_str(),
            "header marker not found, nothing replaced"
        );
        if options.strict {
            return Err(Error::HeaderNotFound {
                path: request.path.clone(),
                header: request.markers.header.as_str().to_string(),
            });
        }
    } else if outcome.blocks_replaced == 0 {
        tracing::warn!(path = %request.path.display(), "no block after header, nothing replaced");
        if options.strict {
            return Err(Error::BlockNotFound {
                path: request.path.clone(),
                header_line: outcome.header_line.unwrap_or_default(),
            });
        }
    } else if outcome.unterminated {
        tracing::warn!(
            path = %request.path.display(),
            start_line = outcome.block_start_line.unwrap_or_default(),
            lines_removed = outcome.lines_removed,
            "block is never closed, trailing lines dropped"
        );
        if options.strict {
            return Err(Error::UnterminatedBlock {
                path: request.path.clone(),
                start_line: outcome.block_start_line.unwrap_or_default(),
                lines_removed: outcome.lines_removed,
            });
        }
    } else if let Some(line) = joined_line(text, &request.replacement, &outcome) {
        tracing::warn!(
            path = %request.path.display(),
            line,
            "replacement does not end with a newline and joins the following line"
        );
        if options.strict {
            return Err(Error::JoinedLine {
                path: request.path.clone(),
                line,
            });
        }
    }

    Ok((out, outcome))
}

/// Input line that gets glued onto the end of an unterminated replacement.
///
/// A second run would then see that joined line as the closing delimiter and
/// drop whatever follows it.
fn joined_line(text: &str, replacement: &str, outcome: &ScanOutcome) -> Option<usize> {
    let end = outcome.block_end_line?;
    if replacement.is_empty() || replacement.ends_with('\n') {
        return None;
    }
    (end < split_lines(text).len()).then_some(end + 1)
}

/// Reads the target file, replaces the block and writes the file back in
/// place. The file is only written once the whole output is built, and only
/// if it changed.
pub fn apply(request: &PatchRequest, options: PatchOptions) -> Result<PatchReport> {
    let text = std::fs::read_to_string(&request.path).map_err(|source| Error::ReadFile {
        path: request.path.clone(),
        source,
    })?;

    let (out, outcome) = patch_text(request, &text, options)?;
    let changed = out != text;

    let written = if changed && !options.dry_run {
        std::fs::write(&request.path, out.as_bytes()).map_err(|source| Error::WriteFile {
            path: request.path.clone(),
            source,
        })?;
        tracing::info!(
            path = %request.path.display(),
            blocks = outcome.blocks_replaced,
            lines_removed = outcome.lines_removed,
            "patched file"
        );
        true
    } else {
        tracing::debug!(path = %request.path.display(), changed, "file left untouched");
        false
    };

    Ok(PatchReport {
        path: request.path.clone(),
        outcome,
        changed,
        written,
    })
}
