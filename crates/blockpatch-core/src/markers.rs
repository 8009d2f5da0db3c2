use crate::{Error, Result};
use regex::Regex;
use serde::Deserialize;

/// Opening line of an embedded Mermaid container.
pub const MERMAID_OPEN: &str = r#"<div class="mermaid">"#;
/// Closing line of an embedded Mermaid container.
pub const MERMAID_CLOSE: &str = "</div>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The line contains the marker text.
    #[default]
    Contains,
    /// The marker is a regular expression searched within the line.
    Regex,
}

/// A single line matcher.
///
/// Matching ignores the line terminator, so `$` anchors in regex markers behave
/// the same for `\n` and `\r\n` files.
#[derive(Debug, Clone)]
pub enum Marker {
    Contains(String),
    Regex(Regex),
}

impl Marker {
    pub fn new(name: &'static str, text: &str, mode: MatchMode) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::InvalidMarker {
                name,
                message: "marker text is empty".to_string(),
            });
        }
        if text.contains('\n') {
            return Err(Error::InvalidMarker {
                name,
                message: "markers match single lines and cannot contain a newline".to_string(),
            });
        }
        match mode {
            MatchMode::Contains => Ok(Self::Contains(text.to_string())),
            MatchMode::Regex => Regex::new(text)
                .map(Self::Regex)
                .map_err(|source| Error::InvalidRegex { name, source }),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        let line = line.trim_end_matches(['\n', '\r']);
        match self {
            Self::Contains(needle) => line.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(line),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Contains(needle) => needle,
            Self::Regex(re) => re.as_str(),
        }
    }
}

/// The header marker plus the delimiter pair of the block to replace.
#[derive(Debug, Clone)]
pub struct Markers {
    pub header: Marker,
    pub open: Marker,
    pub close: Marker,
}

impl Markers {
    pub fn new(header: &str, open: &str, close: &str, mode: MatchMode) -> Result<Self> {
        Ok(Self {
            header: Marker::new("header", header, mode)?,
            open: Marker::new("open", open, mode)?,
            close: Marker::new("close", close, mode)?,
        })
    }

    /// Markers for the first `<div class="mermaid">` container after `header`.
    pub fn mermaid(header: &str) -> Result<Self> {
        Ok(Self {
            header: Marker::new("header", header, MatchMode::Contains)?,
            open: Marker::Contains(MERMAID_OPEN.to_string()),
            close: Marker::Contains(MERMAID_CLOSE.to_string()),
        })
    }
}
