//! Wrapweld: host-language binding synthesis for foreign libraries
//!
//! Wrapweld turns shallow signature metadata of a foreign (Python) library
//! into statically-typed Java wrapper classes. Every foreign callable
//! becomes a set of overloads, one per arity the metadata allows, plus a
//! keyword-map overload for methods with optional parameters.
//!
//! # Architecture
//!
//! - `ir`: metadata descriptors and the generated binding plan
//! - `synth`: naming, class deduplication and overload synthesis
//! - `codegen`: Java source emission for binding plans
//! - `build`: runtime bridges, output sinks and the batch orchestrator
//!
//! # Usage
//!
//! ```rust,ignore
//! use wrapweld::{BindingSynthesizer, LibraryDescriptor};
//!
//! let library = LibraryDescriptor::from_json(&metadata)?;
//! let plan = BindingSynthesizer::default().synthesize(library);
//! for owner in &plan.owners {
//!     println!("{}: {} bindings", owner.name, owner.bindings.len());
//! }
//! ```

pub mod build;
pub mod codegen;
pub mod ir;
pub mod synth;

// Re-export commonly used types
pub use build::{
    BatchGenerator, BatchReport, BindingSink, BridgeError, GenerationError, GenerationRequest,
    MemorySink, MetadataDirBridge, PythonBridge, RequestError, RuntimeBridge, SinkError,
    SourceTreeSink,
};
pub use codegen::{EmitConfig, JavaGenerator};
pub use ir::{
    BindingOwner, BindingPlan, CallTarget, CallableDescriptor, ClassDescriptor, DescriptorError,
    GeneratedBinding, ImportStatement, LibraryDescriptor, LibraryDocument, OwnerKind, SkipReason,
};
pub use synth::{BindingSynthesizer, SynthesisConfig};
