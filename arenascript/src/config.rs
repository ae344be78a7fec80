use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FLATTENER: &str = "/usr/share/inkscape/extensions/flatten.py";

/// Knobs for one conversion run. Loaded from JSON; every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    /// Program invoked to reduce curves to move/line/close path data.
    pub flattener: String,
    /// Arguments placed before the generated `--flatness`/`--id` arguments.
    pub flattener_args: Vec<String>,
    pub flatness: f64,
    /// Arena side length in SVG units; `load-svg` emits `arena_size * scale`.
    pub arena_size: f64,
    /// Decimal places for every emitted coordinate.
    pub precision: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            flattener: DEFAULT_FLATTENER.to_string(),
            flattener_args: Vec::new(),
            flatness: 0.1,
            arena_size: 200.0,
            precision: 6,
        }
    }
}

impl ConvertOptions {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let opts: ConvertOptions = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::io(format!("reading options {}", path.display()), e))?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if !(self.flatness.is_finite() && self.flatness > 0.0) {
            return Err(ConvertError::Range {
                what: format!("flatness {}", self.flatness),
            });
        }
        if !(self.arena_size.is_finite() && self.arena_size > 0.0) {
            return Err(ConvertError::Range {
                what: format!("arena_size {}", self.arena_size),
            });
        }
        Ok(())
    }

    /// Formats a number the way every emitted coordinate is formatted.
    pub fn fmt_num(&self, v: f64) -> String {
        format!("{:.*}", self.precision, v)
    }
}
