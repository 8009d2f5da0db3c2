use crate::markers::{MERMAID_CLOSE, MERMAID_OPEN, Markers, MatchMode};
use crate::presets::Preset;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Marker text as written in a config file or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub header: Option<String>,
    pub open: Option<String>,
    pub close: Option<String>,
    #[serde(rename = "match")]
    pub mode: Option<MatchMode>,
}

/// One patch job, possibly incomplete until layers are merged.
///
/// ```yaml
/// path: docs/DOCUMENTATION.html
/// markers:
///   header: "<h4>Class Diagram</h4>"
/// replacement_file: class_diagram.html
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatchConfig {
    pub path: Option<PathBuf>,
    pub preset: Option<String>,
    pub markers: MarkerConfig,
    pub replacement: Option<String>,
    pub replacement_file: Option<PathBuf>,
}

/// A fully resolved patch job.
#[derive(Debug, Clone)]
pub struct PatchRequest {
    pub path: PathBuf,
    pub markers: Markers,
    pub replacement: String,
}

impl PatchConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a config file. `.json` files are read as JSON, everything else as
    /// YAML. Relative paths inside the file are resolved against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut cfg = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        cfg.path = cfg.path.map(|p| rebase(base, p));
        cfg.replacement_file = cfg.replacement_file.map(|p| rebase(base, p));
        tracing::debug!(config = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Overlays `other` on top of `self`; values set in `other` win.
    pub fn merge(&mut self, other: PatchConfig) {
        if other.path.is_some() {
            self.path = other.path;
        }
        if other.preset.is_some() {
            self.preset = other.preset;
        }
        if other.markers.header.is_some() {
            self.markers.header = other.markers.header;
        }
        if other.markers.open.is_some() {
            self.markers.open = other.markers.open;
        }
        if other.markers.close.is_some() {
            self.markers.close = other.markers.close;
        }
        if other.markers.mode.is_some() {
            self.markers.mode = other.markers.mode;
        }
        // Inline text and a replacement file are alternatives: the newer layer
        // replaces whichever the older one used.
        if other.replacement.is_some() {
            self.replacement = other.replacement;
            self.replacement_file = None;
        } else if other.replacement_file.is_some() {
            self.replacement_file = other.replacement_file;
            self.replacement = None;
        }
    }

    /// Applies the preset (if any), reads the replacement file and compiles
    /// the markers.
    pub fn resolve(self) -> Result<PatchRequest> {
        let preset = self.preset.as_deref().map(Preset::by_name).transpose()?;

        let path = self.path.ok_or(Error::MissingPath)?;
        let header = self
            .markers
            .header
            .or_else(|| preset.map(|p| p.header.to_string()))
            .ok_or(Error::MissingHeader)?;
        let open = self
            .markers
            .open
            .or_else(|| preset.map(|p| p.open.to_string()))
            .unwrap_or_else(|| MERMAID_OPEN.to_string());
        let close = self
            .markers
            .close
            .or_else(|| preset.map(|p| p.close.to_string()))
            .unwrap_or_else(|| MERMAID_CLOSE.to_string());
        let mode = self.markers.mode.unwrap_or_default();
        let markers = Markers::new(&header, &open, &close, mode)?;

        let replacement = match (self.replacement, self.replacement_file) {
            (Some(text), _) => text,
            (None, Some(file)) => {
                std::fs::read_to_string(&file).map_err(|source| Error::ReadFile {
                    path: file.clone(),
                    source,
                })?
            }
            (None, None) => preset
                .map(|p| p.replacement.to_string())
                .ok_or(Error::MissingReplacement)?,
        };

        Ok(PatchRequest {
            path,
            markers,
            replacement,
        })
    }
}

fn rebase(base: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() { p } else { base.join(p) }
}
