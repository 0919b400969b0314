//! Output sinks
//!
//! A sink persists one request's binding plan as soon as it is synthesized.
//! Nothing is rolled back if a later request in the batch fails.

use crate::build::GenerationRequest;
use crate::codegen::{EmitConfig, JavaGenerator};
use crate::ir::BindingPlan;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// File the serialized plan is written to, next to the sources
pub const PLAN_FILE_NAME: &str = "bindings.json";

/// Errors raised while persisting a plan
#[derive(Debug, Error)]
pub enum SinkError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Plan serialization error
    #[error("Failed to serialize binding plan: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for synthesized plans
pub trait BindingSink {
    /// Persist `plan`, returning the paths written
    fn persist(
        &mut self,
        request: &GenerationRequest,
        plan: &BindingPlan,
    ) -> Result<Vec<PathBuf>, SinkError>;
}

impl<S: BindingSink + ?Sized> BindingSink for &mut S {
    fn persist(
        &mut self,
        request: &GenerationRequest,
        plan: &BindingPlan,
    ) -> Result<Vec<PathBuf>, SinkError> {
        (**self).persist(request, plan)
    }
}

/// Full target package for a plan (e.g., "wrapweld.generated.matplotlib_pyplot")
pub fn target_package(request: &GenerationRequest, plan: &BindingPlan) -> String {
    let segment = plan.package_segment();
    if request.namespace.is_empty() {
        segment
    } else {
        format!("{}.{}", request.namespace, segment)
    }
}

/// Writes one Java source file per owner under the request's output root
#[derive(Debug, Clone, Default)]
pub struct SourceTreeSink {
    emit: EmitConfig,
}

impl SourceTreeSink {
    pub fn new(emit: EmitConfig) -> Self {
        Self { emit }
    }

    pub fn emit_config(&self) -> &EmitConfig {
        &self.emit
    }
}

impl BindingSink for SourceTreeSink {
    fn persist(
        &mut self,
        request: &GenerationRequest,
        plan: &BindingPlan,
    ) -> Result<Vec<PathBuf>, SinkError> {
        let package = target_package(request, plan);
        let dir = package
            .split('.')
            .fold(request.output.clone(), |path, segment| path.join(segment));
        fs::create_dir_all(&dir)?;

        let mut written = Vec::with_capacity(plan.owners.len() + 1);
        for owner in &plan.owners {
            let generator = JavaGenerator::new(owner, &package, &self.emit);
            let path = dir.join(generator.file_name());
            fs::write(&path, generator.generate())?;
            debug!(owner = %owner.name, path = %path.display(), "sink.write_owner");
            written.push(path);
        }

        if self.emit.write_plan {
            let path = dir.join(PLAN_FILE_NAME);
            fs::write(&path, serde_json::to_string_pretty(plan)?)?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Keeps plans in memory; for dry runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub plans: Vec<(GenerationRequest, BindingPlan)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan persisted for `library`, if any
    pub fn plan(&self, library: &str) -> Option<&BindingPlan> {
        self.plans
            .iter()
            .find(|(_, plan)| plan.library == library)
            .map(|(_, plan)| plan)
    }
}

impl BindingSink for MemorySink {
    fn persist(
        &mut self,
        request: &GenerationRequest,
        plan: &BindingPlan,
    ) -> Result<Vec<PathBuf>, SinkError> {
        self.plans.push((request.clone(), plan.clone()));
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CallableDescriptor, ClassDescriptor, LibraryDescriptor};
    use crate::synth::BindingSynthesizer;

    fn plan() -> BindingPlan {
        BindingSynthesizer::default().synthesize(
            LibraryDescriptor::new("matplotlib.pyplot")
                .function(CallableDescriptor::new("show").in_module("matplotlib.pyplot"))
                .class(ClassDescriptor::new("Figure", "matplotlib.figure")),
        )
    }

    #[test]
    fn test_target_package() {
        let request = GenerationRequest::new("matplotlib.pyplot").with_namespace("demo.gen");
        assert_eq!(target_package(&request, &plan()), "demo.gen.matplotlib_pyplot");

        let bare = GenerationRequest::new("matplotlib.pyplot").with_namespace("");
        assert_eq!(target_package(&bare, &plan()), "matplotlib_pyplot");
    }

    #[test]
    fn test_source_tree_sink_writes_owners() {
        let dir = tempfile::tempdir().unwrap();
        let request = GenerationRequest::new("matplotlib.pyplot")
            .with_output(dir.path())
            .with_namespace("demo.gen");

        let written = SourceTreeSink::default().persist(&request, &plan()).unwrap();

        let package_dir = dir.path().join("demo").join("gen").join("matplotlib_pyplot");
        assert_eq!(
            written,
            vec![
                package_dir.join("JPyplot.java"),
                package_dir.join("JFigure.java"),
                package_dir.join(PLAN_FILE_NAME),
            ]
        );

        let source = fs::read_to_string(package_dir.join("JPyplot.java")).unwrap();
        assert!(source.contains("package demo.gen.matplotlib_pyplot;"));
        assert!(source.contains("public static Object show() {"));

        let json = fs::read_to_string(package_dir.join(PLAN_FILE_NAME)).unwrap();
        let reread: BindingPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(reread, plan());
    }

    #[test]
    fn test_source_tree_sink_without_plan_file() {
        let dir = tempfile::tempdir().unwrap();
        let request = GenerationRequest::new("matplotlib.pyplot").with_output(dir.path());
        let emit = EmitConfig {
            write_plan: false,
            ..EmitConfig::default()
        };

        let mut sink = SourceTreeSink::new(emit);
        assert!(!sink.emit_config().write_plan);

        let written = sink.persist(&request, &plan()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|p| p.extension().is_some_and(|e| e == "java")));
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.persist(&GenerationRequest::new("matplotlib.pyplot"), &plan())
            .unwrap();

        assert_eq!(sink.plans.len(), 1);
        assert!(sink.plan("matplotlib.pyplot").is_some());
        assert!(sink.plan("numpy").is_none());
    }
}
