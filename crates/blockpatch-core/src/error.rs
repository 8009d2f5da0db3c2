use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("invalid {name} marker: {message}")]
    InvalidMarker { name: &'static str, message: String },

    #[error("invalid {name} marker regex: {source}")]
    InvalidRegex {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("no replacement text configured")]
    MissingReplacement,

    #[error("no target file configured")]
    MissingPath,

    #[error("no header marker configured")]
    MissingHeader,

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("header marker `{header}` not found in {}", .path.display())]
    HeaderNotFound { path: PathBuf, header: String },

    #[error("no block found after header line {header_line} in {}", .path.display())]
    BlockNotFound { path: PathBuf, header_line: usize },

    #[error(
        "block starting at line {start_line} in {} is never closed; {lines_removed} trailing lines would be dropped",
        .path.display()
    )]
    UnterminatedBlock {
        path: PathBuf,
        start_line: usize,
        lines_removed: usize,
    },

    #[error(
        "replacement does not end with a newline; it would join line {line} of {} onto its last line",
        .path.display()
    )]
    JoinedLine { path: PathBuf, line: usize },
}
