//! Batch generation
//!
//! This module connects the synthesizer to the outside world:
//! - `RuntimeBridge` implementations that extract library metadata
//! - `BindingSink` implementations that persist synthesized plans
//! - `BatchGenerator`, which runs a list of requests through both

pub mod batch;
pub mod bridge;
pub mod sink;

pub use batch::{
    BatchGenerator, BatchReport, GenerationError, GenerationRequest, RequestError, RequestOutcome,
    DEFAULT_NAMESPACE, DEFAULT_OUTPUT,
};
pub use bridge::{BridgeError, MetadataDirBridge, PythonBridge, RuntimeBridge, ANALYZER_SCRIPT};
pub use sink::{target_package, BindingSink, MemorySink, SinkError, SourceTreeSink, PLAN_FILE_NAME};
