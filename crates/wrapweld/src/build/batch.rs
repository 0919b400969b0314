//! Batch orchestration
//!
//! `BatchGenerator` drives a list of generation requests through
//! extraction, synthesis and persistence, one request at a time:
//!
//! ```text
//! request -> bridge.extract -> LibraryDescriptor -> synthesize -> sink.persist
//! ```
//!
//! A failing request does not stop the batch and does not undo the output
//! of earlier requests. The bridge is released once after the last request,
//! and the batch then fails as a whole if any request failed.
//!
//! # Example
//! ```ignore
//! use wrapweld::build::{BatchGenerator, GenerationRequest, MetadataDirBridge, SourceTreeSink};
//!
//! let report = BatchGenerator::new(MetadataDirBridge::new("metadata"), SourceTreeSink::default())
//!     .generate(&[GenerationRequest::new("matplotlib.pyplot")])?;
//! ```

use crate::build::{BindingSink, BridgeError, RuntimeBridge, SinkError};
use crate::ir::{DescriptorError, LibraryDescriptor};
use crate::synth::BindingSynthesizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// Default output root for generated sources
pub const DEFAULT_OUTPUT: &str = "src/main/java";
/// Default namespace prefix for generated packages
pub const DEFAULT_NAMESPACE: &str = "wrapweld.generated";

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// One library to generate bindings for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Dotted foreign library path (e.g., "matplotlib.pyplot")
    #[serde(default)]
    pub library: String,
    /// Package the library is distributed as, when it differs from the import path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    /// Restrict generation to these top-level names; empty means everything
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_only: Vec<String>,
    /// Output root for generated sources
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Namespace the library's package is nested under
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl GenerationRequest {
    /// Create a request with default output and namespace
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            dependency: None,
            include_only: Vec::new(),
            output: default_output(),
            namespace: default_namespace(),
        }
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    /// Restrict generation to the given names
    pub fn include_only(mut self, names: &[&str]) -> Self {
        self.include_only = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = output.as_ref().to_path_buf();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Why a single request failed
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request itself is unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The bridge could not produce metadata
    #[error("Extraction failed: {0}")]
    Extraction(#[from] BridgeError),

    /// The metadata could not be turned into a library descriptor
    #[error("Invalid descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    /// The plan could not be written
    #[error("Persist failed: {0}")]
    Persist(#[from] SinkError),
}

/// Result of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome {
    pub library: String,
    pub succeeded: bool,
    /// Number of bindings synthesized
    pub bindings: usize,
    /// Number of symbols skipped during synthesis
    pub skipped: usize,
    /// Paths the sink wrote
    pub files: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestOutcome {
    fn failed(library: &str, err: &RequestError) -> Self {
        Self {
            library: library.to_string(),
            succeeded: false,
            bindings: 0,
            skipped: 0,
            files: Vec::new(),
            error: Some(err.to_string()),
        }
    }
}

/// Per-request outcomes of a batch, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<RequestOutcome>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &RequestOutcome> {
        self.outcomes.iter().filter(|o| o.succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &RequestOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} requests failed",
            self.failed().count(),
            self.outcomes.len()
        )?;
        let libraries: Vec<&str> = self.failed().map(|o| o.library.as_str()).collect();
        if !libraries.is_empty() {
            write!(f, " ({})", libraries.join(", "))?;
        }
        Ok(())
    }
}

/// Terminal batch failure
#[derive(Debug, Error)]
pub enum GenerationError {
    /// One or more requests failed; successful requests were still persisted
    #[error("Binding generation failed: {0}")]
    Failed(BatchReport),

    /// Every request succeeded but the bridge could not be released
    #[error("Failed to release runtime bridge: {0}")]
    Release(#[source] BridgeError),
}

impl GenerationError {
    /// Report of the batch, when requests were attempted
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            GenerationError::Failed(report) => Some(report),
            GenerationError::Release(_) => None,
        }
    }
}

/// Drives requests through a bridge, the synthesizer and a sink
pub struct BatchGenerator<B, S> {
    bridge: B,
    sink: S,
    synthesizer: BindingSynthesizer,
}

impl<B: RuntimeBridge, S: BindingSink> BatchGenerator<B, S> {
    /// Create a generator with the default synthesizer
    pub fn new(bridge: B, sink: S) -> Self {
        Self {
            bridge,
            sink,
            synthesizer: BindingSynthesizer::default(),
        }
    }

    /// Use a configured synthesizer
    pub fn with_synthesizer(mut self, synthesizer: BindingSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Run every request, then release the bridge
    ///
    /// Consumes the generator so the bridge cannot be used after release.
    pub fn generate(
        mut self,
        requests: &[GenerationRequest],
    ) -> Result<BatchReport, GenerationError> {
        let mut report = BatchReport::default();

        for request in requests {
            info!(
                library = %request.library,
                dependency = ?request.dependency,
                "Generating bindings"
            );
            let outcome = match self.run_request(request) {
                Ok(outcome) => {
                    info!(
                        library = %outcome.library,
                        bindings = outcome.bindings,
                        files = outcome.files.len(),
                        "Generated bindings"
                    );
                    outcome
                }
                Err(err) => {
                    error!(library = %request.library, error = %err, "Binding generation failed");
                    RequestOutcome::failed(&request.library, &err)
                }
            };
            report.outcomes.push(outcome);
        }

        let released = self.bridge.release();

        if !report.is_success() {
            if let Err(err) = released {
                warn!(error = %err, "Failed to release runtime bridge");
            }
            return Err(GenerationError::Failed(report));
        }
        released.map_err(GenerationError::Release)?;

        Ok(report)
    }

    fn run_request(&mut self, request: &GenerationRequest) -> Result<RequestOutcome, RequestError> {
        if request.library.trim().is_empty() {
            return Err(RequestError::InvalidRequest(
                "library path is empty".to_string(),
            ));
        }

        let document = self
            .bridge
            .extract(&request.library, &request.include_only)?;
        let library =
            LibraryDescriptor::try_from(document)?.retain_allowed(&request.include_only);

        let plan = self.synthesizer.synthesize(library);
        let files = self.sink.persist(request, &plan)?;

        Ok(RequestOutcome {
            library: plan.library.clone(),
            succeeded: true,
            bindings: plan.binding_count(),
            skipped: plan.skipped.len(),
            files,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::MemorySink;
    use crate::ir::LibraryDocument;

    #[derive(Default)]
    struct EchoBridge {
        extracted: Vec<String>,
        releases: usize,
    }

    impl RuntimeBridge for EchoBridge {
        fn extract(
            &mut self,
            library: &str,
            _include_only: &[String],
        ) -> Result<LibraryDocument, BridgeError> {
            self.extracted.push(library.to_string());
            LibraryDocument::from_json(&format!(
                r#"{{"library": "{}", "functions": [{{"name": "run", "args": ["a"]}}]}}"#,
                library
            ))
            .map_err(|source| BridgeError::MalformedOutput {
                library: library.to_string(),
                source,
            })
        }

        fn release(&mut self) -> Result<(), BridgeError> {
            self.releases += 1;
            Ok(())
        }
    }

    #[test]
    fn test_request_defaults() {
        let request: GenerationRequest = serde_json::from_str(r#"{"library": "numpy"}"#).unwrap();
        assert_eq!(request.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(request.namespace, DEFAULT_NAMESPACE);
        assert!(request.include_only.is_empty());
        assert_eq!(request, GenerationRequest::new("numpy"));

        let request: GenerationRequest =
            serde_json::from_str(r#"{"library": "skimage", "dependency": "scikit-image"}"#).unwrap();
        assert_eq!(
            request,
            GenerationRequest::new("skimage").with_dependency("scikit-image")
        );
    }

    #[test]
    fn test_generate_success() {
        let mut bridge = EchoBridge::default();
        let mut sink = MemorySink::new();

        let report = BatchGenerator::new(&mut bridge, &mut sink)
            .generate(&[GenerationRequest::new("numpy"), GenerationRequest::new("scipy")])
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.outcomes[0].bindings, 2);
        assert_eq!(bridge.extracted, vec!["numpy", "scipy"]);
        assert_eq!(bridge.releases, 1);
        assert_eq!(sink.plans.len(), 2);
    }

    #[test]
    fn test_empty_library_rejected_without_extraction() {
        let mut bridge = EchoBridge::default();
        let err = BatchGenerator::new(&mut bridge, MemorySink::new())
            .generate(&[GenerationRequest::new(" ")])
            .unwrap_err();

        assert!(bridge.extracted.is_empty());
        assert_eq!(bridge.releases, 1);
        let report = err.report().unwrap();
        assert!(report.outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .starts_with("Invalid request"));
    }

    #[test]
    fn test_empty_batch_releases_once() {
        let mut bridge = EchoBridge::default();
        let report = BatchGenerator::new(&mut bridge, MemorySink::new())
            .generate(&[])
            .unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(bridge.releases, 1);
    }

    #[test]
    fn test_failure_display() {
        let report = BatchReport {
            outcomes: vec![RequestOutcome::failed(
                "nosuchlib",
                &RequestError::InvalidRequest("x".into()),
            )],
        };
        let err = GenerationError::Failed(report);
        assert_eq!(
            err.to_string(),
            "Binding generation failed: 1 of 1 requests failed (nosuchlib)"
        );
    }
}
