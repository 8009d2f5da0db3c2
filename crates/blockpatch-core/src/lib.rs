#![forbid(unsafe_code)]

//! Replace the diagram block that follows a heading in a documentation file.
//!
//! The matching is line based, never structural: a header marker arms the
//! scanner, the next line matching the opening delimiter starts the block, and
//! the next line matching the closing delimiter ends it. The whole block is
//! swapped for the replacement text, everything else is copied verbatim.
//!
//! ```
//! use blockpatch_core::{Markers, replace_block_in_text};
//!
//! let markers = Markers::mermaid("MARK").unwrap();
//! let input = "<h4>MARK</h4>\n<div class=\"mermaid\">\nOLD\n</div>\n";
//! let (out, outcome) = replace_block_in_text(input, &markers, "NEW\n");
//! assert_eq!(out, "<h4>MARK</h4>\nNEW\n");
//! assert_eq!(outcome.blocks_replaced, 1);
//! ```

pub mod config;
pub mod error;
pub mod markers;
pub mod patch;
pub mod presets;
pub mod scan;

pub use config::{MarkerConfig, PatchConfig, PatchRequest};
pub use error::{Error, Result};
pub use markers::{Marker, Markers, MatchMode};
pub use patch::{PatchOptions, PatchReport, apply, patch_text};
pub use presets::Preset;
pub use scan::{Scan, ScanOutcome, ScanState, replace_block, replace_block_in_text, split_lines};

#[cfg(test)]
mod tests;
