//! Configuration structures for the page preparation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::layout::LayoutParams;

/// Main configuration for the pdftab pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdftabConfig {
    /// Page preparation configuration.
    pub handler: HandlerConfig,

    /// Options handed to the table parser.
    pub parser: ParserConfig,
}

/// What to do when a single page fails to prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageErrorPolicy {
    /// Stop the run and return the first error.
    #[default]
    Abort,
    /// Log the failure and continue with the remaining pages.
    Skip,
}

/// Page preparation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Directory in which the per-run temporary directory is created
    /// (system temp dir when unset).
    pub temp_root: Option<PathBuf>,

    /// Detect and correct rotated pages.
    pub correct_rotation: bool,

    /// Failure handling for individual pages.
    pub on_page_error: PageErrorPolicy,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            temp_root: None,
            correct_rotation: true,
            on_page_error: PageErrorPolicy::Abort,
        }
    }
}

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Tables delimited by ruling lines.
    #[default]
    Lattice,
    /// Tables inferred from whitespace between text.
    Stream,
}

/// Options passed to the table parser for every page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Detection strategy.
    pub flavor: Flavor,

    /// Ask the parser not to emit warnings.
    pub suppress_warnings: bool,

    /// Layout analysis parameters.
    pub layout: LayoutParams,
}

impl PdftabConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> crate::Result<()> {
        let layout = &self.parser.layout;
        if layout.char_margin.is_nan() || layout.char_margin <= 0.0 {
            return Err(crate::PdftabError::Config(format!(
                "char_margin must be positive, got {}",
                layout.char_margin
            )));
        }
        if !(0.0..=1.0).contains(&layout.line_overlap) {
            return Err(crate::PdftabError::Config(format!(
                "line_overlap must be within 0..=1, got {}",
                layout.line_overlap
            )));
        }
        Ok(())
    }
}
