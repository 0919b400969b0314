//! Synthesis configuration

use serde::{Deserialize, Serialize};

/// Knobs for binding synthesis
///
/// Every field has a default, so an empty `[synthesis]` table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Module substrings whose classes are never wrapped
    pub denied_module_patterns: Vec<String>,
    /// Suffix joined onto the library name to form its canonical module
    pub canonical_module_suffix: String,
    /// Docs longer than this many characters are truncated
    pub doc_max_chars: usize,
    /// Suffix distinguishing the keyword-tail overload
    pub kwargs_suffix: String,
    /// Prefix for generated owner names
    pub owner_prefix: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            denied_module_patterns: vec![
                ".interchange.".to_string(),
                "._libs.".to_string(),
                ".testing".to_string(),
            ],
            canonical_module_suffix: ".core.frame".to_string(),
            doc_max_chars: 200,
            kwargs_suffix: "WithKwargs".to_string(),
            owner_prefix: "J".to_string(),
        }
    }
}

impl SynthesisConfig {
    /// Set the canonical module suffix
    pub fn with_canonical_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.canonical_module_suffix = suffix.into();
        self
    }

    /// Set the doc length bound
    pub fn with_doc_max_chars(mut self, max: usize) -> Self {
        self.doc_max_chars = max;
        self
    }

    /// Canonical module for a library ("pandas" -> "pandas.core.frame")
    pub fn canonical_module(&self, library: &str) -> String {
        format!("{}{}", library, self.canonical_module_suffix)
    }

    /// Whether classes declared in `module` are excluded
    pub fn is_denied_module(&self, module: &str) -> bool {
        self.denied_module_patterns
            .iter()
            .any(|pattern| module.contains(pattern.as_str()))
    }
}
