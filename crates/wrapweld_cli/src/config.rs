//! Batch file (`wrapweld.toml`)
//!
//! ```toml
//! [synthesis]
//! doc_max_chars = 120
//!
//! [bridge]
//! kind = "python"
//!
//! [[request]]
//! library = "matplotlib.pyplot"
//! dependency = "matplotlib"
//! namespace = "demo.plots"
//! ```
//!
//! Relative `output` and `metadata_dir` paths resolve against the
//! directory containing the batch file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use wrapweld::{EmitConfig, GenerationRequest, SynthesisConfig};

/// Which runtime bridge a batch extracts through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeKind {
    /// Run the bundled analyzer in a Python interpreter
    #[default]
    Python,
    /// Read pre-extracted `<library>.json` documents
    Metadata,
}

/// `[bridge]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub kind: BridgeKind,
    /// Interpreter path; looked up on PATH when absent
    pub python: Option<PathBuf>,
    /// Directory of metadata documents for `kind = "metadata"`
    pub metadata_dir: Option<PathBuf>,
}

/// A parsed batch file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub emit: EmitConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default, rename = "request")]
    pub requests: Vec<GenerationRequest>,
}

impl BatchFile {
    /// Parse a batch file from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse batch file")
    }

    /// Load a batch file, resolving relative paths against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let batch = Self::parse(&content).with_context(|| format!("In {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(batch.resolve_paths(base))
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        for request in &mut self.requests {
            if request.output.is_relative() {
                request.output = base.join(&request.output);
            }
        }
        if let Some(dir) = self.bridge.metadata_dir.take() {
            self.bridge.metadata_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        self
    }
}
