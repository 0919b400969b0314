//! Symbol metadata for foreign callables and classes
//!
//! This module provides the descriptors produced by the metadata extractor
//! for free functions, methods and classes. Descriptors only carry shallow
//! signature data: names, parameter names, an optional-parameter count and
//! a docstring.

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata for a single foreign callable (free function or method)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallableDescriptor {
    /// Foreign name (e.g., "read_csv", "__init__")
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// Ordered parameter names, "self" included for methods
    #[serde(rename = "args", alias = "params", default)]
    pub params: Vec<String>,
    /// How many trailing parameters are optional
    #[serde(default)]
    pub optional_count: usize,
    /// Docstring
    #[serde(default)]
    pub doc: Option<String>,
    /// Declaring module path (e.g., "pandas.io.parsers.readers")
    #[serde(default, deserialize_with = "nullable_string")]
    pub module: String,
}

impl CallableDescriptor {
    /// Create a new callable with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            optional_count: 0,
            doc: None,
            module: String::new(),
        }
    }

    /// Set parameter names
    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Set the optional trailing parameter count
    pub fn optional(mut self, count: usize) -> Self {
        self.optional_count = count;
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set declaring module
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Number of declared parameters
    pub fn total_params(&self) -> usize {
        self.params.len()
    }

    /// Optional count, never larger than the parameter list
    pub fn optional_params(&self) -> usize {
        self.optional_count.min(self.params.len())
    }

    /// Clamp `optional_count` into `0..=params.len()`
    pub(crate) fn normalize(&mut self) {
        if self.optional_count > self.params.len() {
            tracing::debug!(
                callable = %self.name,
                optional = self.optional_count,
                params = self.params.len(),
                "clamping optional count"
            );
            self.optional_count = self.params.len();
        }
    }
}

/// Metadata for a foreign class and its methods
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Simple class name (e.g., "DataFrame")
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// Declaring module (e.g., "pandas.core.frame")
    #[serde(default, deserialize_with = "nullable_string")]
    pub module: String,
    /// Class docstring
    #[serde(default)]
    pub doc: Option<String>,
    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<CallableDescriptor>,
}

impl ClassDescriptor {
    /// Create a new class
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            doc: None,
            methods: Vec::new(),
        }
    }

    /// Add a method
    pub fn method(mut self, method: CallableDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Fully qualified foreign name (module + "." + name)
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }

    pub(crate) fn normalize(&mut self) {
        for method in &mut self.methods {
            if method.module.is_empty() {
                method.module = self.module.clone();
            }
            method.normalize();
        }
    }
}

/// Treat an explicit JSON `null` like a missing string
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callable_from_extractor_json() {
        let json = r#"{
            "name": "read_csv",
            "args": ["filepath_or_buffer", "sep", "delimiter"],
            "optionalCount": 2,
            "doc": "Read a comma-separated values file.",
            "module": "pandas.io.parsers.readers",
            "signatureSource": "inspect"
        }"#;

        let callable: CallableDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(callable.name, "read_csv");
        assert_eq!(callable.total_params(), 3);
        assert_eq!(callable.optional_params(), 2);
        assert_eq!(callable.module, "pandas.io.parsers.readers");
    }

    #[test]
    fn test_missing_fields_default() {
        let callable: CallableDescriptor =
            serde_json::from_str(r#"{"name": "head", "doc": null, "module": null}"#).unwrap();
        assert!(callable.params.is_empty());
        assert_eq!(callable.optional_count, 0);
        assert_eq!(callable.doc, None);
        assert_eq!(callable.module, "");
    }

    #[test]
    fn test_params_alias() {
        let callable: CallableDescriptor =
            serde_json::from_str(r#"{"name": "f", "params": ["a", "b"]}"#).unwrap();
        assert_eq!(callable.params, vec!["a", "b"]);
    }

    #[test]
    fn test_optional_count_is_clamped() {
        let mut callable = CallableDescriptor::new("f").with_params(&["a"]).optional(3);
        assert_eq!(callable.optional_params(), 1);
        callable.normalize();
        assert_eq!(callable.optional_count, 1);
    }

    #[test]
    fn test_class_methods_inherit_module() {
        let mut class = ClassDescriptor::new("DataFrame", "pandas.core.frame")
            .method(CallableDescriptor::new("head").with_params(&["self", "n"]).optional(1));
        class.normalize();

        assert_eq!(class.methods[0].module, "pandas.core.frame");
        assert_eq!(class.qualified_name(), "pandas.core.frame.DataFrame");
    }
}
