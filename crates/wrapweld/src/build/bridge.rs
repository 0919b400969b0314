//! Runtime bridges
//!
//! A bridge is the single shared execution context through which library
//! metadata is extracted. The batch orchestrator owns it, uses it for one
//! request at a time and releases it exactly once when the batch ends.

use crate::ir::LibraryDocument;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Extractor script run by [`PythonBridge`]
pub const ANALYZER_SCRIPT: &str = include_str!("../../scripts/analyzer.py");

/// Errors raised by a runtime bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No interpreter could be located
    #[error("Python interpreter not found: {0}")]
    InterpreterNotFound(String),

    /// Interpreter could not be spawned
    #[error("Failed to run extractor: {0}")]
    Spawn(#[from] std::io::Error),

    /// Extractor exited unsuccessfully
    #[error("Extractor exited with {status} for {library}: {stderr}")]
    ExitStatus {
        library: String,
        status: String,
        stderr: String,
    },

    /// Extractor output was not a metadata document
    #[error("Malformed extractor output for {library}: {source}")]
    MalformedOutput {
        library: String,
        #[source]
        source: serde_json::Error,
    },

    /// Pre-extracted metadata file missing
    #[error("Metadata not found: {0}")]
    MetadataMissing(PathBuf),

    /// The bridge was already released
    #[error("Runtime bridge used after release")]
    Released,
}

/// Shared execution context for metadata extraction
pub trait RuntimeBridge {
    /// Extract the metadata document for `library`
    ///
    /// `include_only` restricts extraction to the named symbols when non-empty.
    fn extract(
        &mut self,
        library: &str,
        include_only: &[String],
    ) -> Result<LibraryDocument, BridgeError>;

    /// Release the context; called once, after the last extraction
    fn release(&mut self) -> Result<(), BridgeError>;
}

impl<B: RuntimeBridge + ?Sized> RuntimeBridge for &mut B {
    fn extract(
        &mut self,
        library: &str,
        include_only: &[String],
    ) -> Result<LibraryDocument, BridgeError> {
        (**self).extract(library, include_only)
    }

    fn release(&mut self) -> Result<(), BridgeError> {
        (**self).release()
    }
}

impl<B: RuntimeBridge + ?Sized> RuntimeBridge for Box<B> {
    fn extract(
        &mut self,
        library: &str,
        include_only: &[String],
    ) -> Result<LibraryDocument, BridgeError> {
        (**self).extract(library, include_only)
    }

    fn release(&mut self) -> Result<(), BridgeError> {
        (**self).release()
    }
}

/// Bridge over pre-extracted `<library>.json` documents
#[derive(Debug)]
pub struct MetadataDirBridge {
    dir: PathBuf,
    released: bool,
}

impl MetadataDirBridge {
    /// Read documents from `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            released: false,
        }
    }

    /// Path of the document for `library`
    pub fn document_path(&self, library: &str) -> PathBuf {
        self.dir.join(format!("{}.json", library))
    }
}

impl RuntimeBridge for MetadataDirBridge {
    fn extract(
        &mut self,
        library: &str,
        _include_only: &[String],
    ) -> Result<LibraryDocument, BridgeError> {
        if self.released {
            return Err(BridgeError::Released);
        }

        let path = self.document_path(library);
        if !path.exists() {
            return Err(BridgeError::MetadataMissing(path));
        }

        debug!(library = %library, path = %path.display(), "bridge.read_metadata");
        let json = fs::read_to_string(&path)?;
        LibraryDocument::from_json(&json).map_err(|source| BridgeError::MalformedOutput {
            library: library.to_string(),
            source,
        })
    }

    fn release(&mut self) -> Result<(), BridgeError> {
        if self.released {
            return Err(BridgeError::Released);
        }
        self.released = true;
        Ok(())
    }
}

/// Bridge that runs the bundled analyzer in a Python interpreter
#[derive(Debug)]
pub struct PythonBridge {
    interpreter: PathBuf,
    script: String,
    released: bool,
}

impl PythonBridge {
    /// Use an explicit interpreter
    pub fn with_interpreter(interpreter: impl AsRef<Path>) -> Self {
        Self {
            interpreter: interpreter.as_ref().to_path_buf(),
            script: ANALYZER_SCRIPT.to_string(),
            released: false,
        }
    }

    /// Locate `python3` (or `python`) on PATH
    pub fn discover() -> Result<Self, BridgeError> {
        let interpreter = which::which("python3")
            .or_else(|_| which::which("python"))
            .map_err(|e| BridgeError::InterpreterNotFound(e.to_string()))?;
        Ok(Self::with_interpreter(interpreter))
    }

    /// Replace the extractor script
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }
}

impl RuntimeBridge for PythonBridge {
    fn extract(
        &mut self,
        library: &str,
        include_only: &[String],
    ) -> Result<LibraryDocument, BridgeError> {
        if self.released {
            return Err(BridgeError::Released);
        }

        let allow = serde_json::to_string(include_only).map_err(|source| {
            BridgeError::MalformedOutput {
                library: library.to_string(),
                source,
            }
        })?;

        debug!(
            interpreter = %self.interpreter.display(),
            library = %library,
            include_only = ?include_only,
            "bridge.extract"
        );
        let output = Command::new(&self.interpreter)
            .arg("-c")
            .arg(&self.script)
            .arg(library)
            .arg(&allow)
            .output()?;

        if !output.status.success() {
            return Err(BridgeError::ExitStatus {
                library: library.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Imports may print to stdout; the document is the last line
        let stdout = String::from_utf8_lossy(&output.stdout);
        let document = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();

        LibraryDocument::from_json(document).map_err(|source| BridgeError::MalformedOutput {
            library: library.to_string(),
            source,
        })
    }

    fn release(&mut self) -> Result<(), BridgeError> {
        if self.released {
            return Err(BridgeError::Released);
        }
        debug!(interpreter = %self.interpreter.display(), "bridge.release");
        self.released = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_dir_bridge() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("numpy.json"),
            r#"{"library": "numpy", "functions": [{"name": "sum", "args": ["a"]}]}"#,
        )
        .unwrap();

        let mut bridge = MetadataDirBridge::new(dir.path());
        let document = bridge.extract("numpy", &[]).unwrap();
        assert_eq!(document.library.as_deref(), Some("numpy"));
        assert_eq!(document.functions.len(), 1);

        let missing = bridge.extract("pandas", &[]).unwrap_err();
        assert!(matches!(missing, BridgeError::MetadataMissing(_)));
    }

    #[test]
    fn test_metadata_dir_bridge_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "not json").unwrap();

        let err = MetadataDirBridge::new(dir.path()).extract("bad", &[]).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedOutput { .. }));
    }

    #[test]
    fn test_release_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut bridge = MetadataDirBridge::new(dir.path());

        bridge.release().unwrap();
        assert!(matches!(bridge.release(), Err(BridgeError::Released)));
        assert!(matches!(bridge.extract("numpy", &[]), Err(BridgeError::Released)));
    }

    #[test]
    fn test_python_bridge_refuses_after_release() {
        let mut bridge = PythonBridge::with_interpreter("/nonexistent/python3");
        bridge.release().unwrap();
        assert!(matches!(bridge.extract("numpy", &[]), Err(BridgeError::Released)));
    }

    #[test]
    fn test_python_bridge_spawn_failure() {
        let mut bridge = PythonBridge::with_interpreter("/nonexistent/python3");
        assert!(matches!(bridge.extract("numpy", &[]), Err(BridgeError::Spawn(_))));
    }

    #[test]
    fn test_analyzer_script_bundled() {
        assert!(ANALYZER_SCRIPT.contains("def analyze(library, allow)"));
    }
}
