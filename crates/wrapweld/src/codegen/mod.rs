//! Source emission for binding plans
//!
//! The synthesizer stays host-agnostic; this module renders its plans as
//! Java wrapper classes.

pub mod java;

pub use java::{java_string, JavaGenerator};

use serde::{Deserialize, Serialize};

/// Names the emitted sources depend on at runtime
///
/// wrapweld ships no Java runtime. The host project must provide the
/// defaults or override them here:
/// - `wrapweld.runtime.Runtime`, whose static `interpreter()` returns the
///   shared `jep.Interpreter`
/// - `wrapweld.runtime.PyDict`, a keyword map whose `py()` returns the
///   backing foreign dict
///
/// `jep.Interpreter` and `jep.python.PyObject` come from the Jep library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Interpreter type (e.g., "jep.Interpreter")
    pub interpreter_type: String,
    /// Expression yielding the shared interpreter
    pub interpreter_accessor: String,
    /// Keyword map type; must expose `py()` returning a foreign dict
    pub keyword_map_type: String,
    /// Type keyword-tail results are fetched as
    pub foreign_object_type: String,
    /// Also write the serialized plan as `bindings.json`
    pub write_plan: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            interpreter_type: "jep.Interpreter".to_string(),
            interpreter_accessor: "wrapweld.runtime.Runtime.interpreter()".to_string(),
            keyword_map_type: "wrapweld.runtime.PyDict".to_string(),
            foreign_object_type: "jep.python.PyObject".to_string(),
            write_plan: true,
        }
    }
}
