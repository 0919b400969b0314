//! Library metadata
//!
//! `LibraryDocument` is the extractor's output as it arrives on the wire;
//! `LibraryDescriptor` is the validated form the synthesizer consumes.

use crate::ir::{CallableDescriptor, ClassDescriptor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw extractor document
///
/// Every field is optional so that a document with an absent library name
/// still parses; rejection happens in [`LibraryDescriptor::try_from`].
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDocument {
    /// Dotted foreign module path
    #[serde(default)]
    pub library: Option<String>,
    /// Set by the extractor when the library could not be imported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Top-level callables
    #[serde(default)]
    pub functions: Vec<CallableDescriptor>,
    /// Classes
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
}

impl LibraryDocument {
    /// Parse an extractor document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Errors raised while validating an extractor document
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The document has no (or an empty) library name
    #[error("library descriptor has no name")]
    MissingName,

    /// The extractor reported a failure instead of metadata
    #[error("extractor failed for {library}: {message}")]
    Extractor { library: String, message: String },

    /// The document is not valid JSON for the extractor contract
    #[error("malformed metadata document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Validated metadata for one foreign library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDescriptor {
    /// Dotted module path (e.g., "matplotlib.pyplot")
    #[serde(rename = "library")]
    pub name: String,
    /// Top-level callables in extraction order
    pub functions: Vec<CallableDescriptor>,
    /// Classes in extraction order
    pub classes: Vec<ClassDescriptor>,
}

impl LibraryDescriptor {
    /// Create an empty library
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Parse and validate an extractor document
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        Self::try_from(LibraryDocument::from_json(json)?)
    }

    /// Add a top-level callable
    pub fn function(mut self, function: CallableDescriptor) -> Self {
        self.functions.push(function);
        self
    }

    /// Add a class
    pub fn class(mut self, class: ClassDescriptor) -> Self {
        self.classes.push(class);
        self
    }

    /// Keep only functions and classes named in `allow`; an empty list keeps everything
    pub fn retain_allowed(mut self, allow: &[String]) -> Self {
        if allow.is_empty() {
            return self;
        }
        let allowed = |name: &str| allow.iter().any(|a| a == name);
        self.functions.retain(|f| allowed(&f.name));
        self.classes.retain(|c| allowed(&c.name));
        self
    }

    /// Last dotted segment of the library path ("matplotlib.pyplot" -> "pyplot")
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl TryFrom<LibraryDocument> for LibraryDescriptor {
    type Error = DescriptorError;

    fn try_from(document: LibraryDocument) -> Result<Self, Self::Error> {
        if let Some(message) = document.error {
            return Err(DescriptorError::Extractor {
                library: document.library.unwrap_or_default(),
                message,
            });
        }

        let name = match document.library {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(DescriptorError::MissingName),
        };

        let mut functions = document.functions;
        for function in &mut functions {
            if function.module.is_empty() {
                function.module = name.clone();
            }
            function.normalize();
        }

        let mut classes = document.classes;
        for class in &mut classes {
            class.normalize();
        }

        Ok(Self {
            name,
            functions,
            classes,
        })
    }
}
