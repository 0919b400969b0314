//! Generated binding records
//!
//! These are the engine's output: one [`GeneratedBinding`] per emitted
//! overload, grouped under a [`BindingOwner`] (one module-level owner per
//! library plus one per surviving class), collected into a [`BindingPlan`].
//! The plan is read-only to emitters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of owner a binding lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    /// Module-level wrapper of static bindings
    Module,
    /// Instance wrapper around a foreign object
    Class,
}

/// Where a binding forwards its call on the foreign side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CallTarget {
    /// `module.callable`, reachable through the library import
    #[serde(rename_all = "camelCase")]
    ModuleCall { module: String, callable: String },
    /// `alias.callable`, where `alias` is bound to a submodule beforehand
    #[serde(rename_all = "camelCase")]
    AliasedCall {
        alias: String,
        module: String,
        callable: String,
    },
    /// `self.method` on the wrapped receiver
    #[serde(rename_all = "camelCase")]
    MethodCall { method: String },
}

impl CallTarget {
    /// Dotted foreign call path (e.g., "lib.viz.plot", "_pandas_io.read_csv", "self.head")
    pub fn path(&self) -> String {
        match self {
            CallTarget::ModuleCall { module, callable } => format!("{}.{}", module, callable),
            CallTarget::AliasedCall {
                alias, callable, ..
            } => format!("{}.{}", alias, callable),
            CallTarget::MethodCall { method } => format!("self.{}", method),
        }
    }

    /// Alias that must be bound before the call, if any
    pub fn alias(&self) -> Option<&str> {
        match self {
            CallTarget::AliasedCall { alias, .. } => Some(alias),
            _ => None,
        }
    }

    /// Foreign callable name without qualification
    pub fn callable(&self) -> &str {
        match self {
            CallTarget::ModuleCall { callable, .. } | CallTarget::AliasedCall { callable, .. } => {
                callable
            }
            CallTarget::MethodCall { method } => method,
        }
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Identity of an overload within its owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingSignature {
    pub name: String,
    pub arity: usize,
    pub keyword_tail: bool,
}

/// One emitted overload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBinding {
    pub owner_kind: OwnerKind,
    /// Sanitized owner name (e.g., "JDataFrame")
    pub owner_name: String,
    /// Sanitized, reserved-word-guarded host name
    pub binding_name: String,
    /// Number of positional parameters
    pub arity: usize,
    /// Whether a trailing keyword-map parameter follows the positional ones
    pub uses_keyword_tail: bool,
    pub call_target: CallTarget,
    /// The emitter must bind `call_target.alias()` before invoking
    pub requires_alias: bool,
    /// Sanitized doc, never null
    pub doc: String,
}

impl GeneratedBinding {
    /// Positional parameter names, `arg0..arg{arity-1}`
    pub fn positional_args(&self) -> Vec<String> {
        (0..self.arity).map(|i| format!("arg{}", i)).collect()
    }

    pub fn signature(&self) -> BindingSignature {
        BindingSignature {
            name: self.binding_name.clone(),
            arity: self.arity,
            keyword_tail: self.uses_keyword_tail,
        }
    }

    /// Foreign call expression, e.g. `lib.viz.plot(arg0, arg1)` or
    /// `self.query(arg0, **py_kwargs)`
    pub fn foreign_call(&self, kwargs_name: &str) -> String {
        let mut args = self.positional_args();
        if self.uses_keyword_tail {
            args.push(format!("**{}", kwargs_name));
        }
        format!("{}({})", self.call_target.path(), args.join(", "))
    }
}

/// A statement the foreign side must run before any binding of an owner is invoked
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImportStatement {
    /// `import <module>`
    Module { module: String },
    /// `import importlib; <alias> = importlib.import_module('<module>')`
    Alias { alias: String, module: String },
}

impl ImportStatement {
    /// Render as foreign source
    pub fn to_source(&self) -> String {
        match self {
            ImportStatement::Module { module } => format!("import {}", module),
            ImportStatement::Alias { alias, module } => format!(
                "import importlib; {} = importlib.import_module('{}')",
                alias, module
            ),
        }
    }
}

/// A generated wrapper unit: module-level or class-level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingOwner {
    pub kind: OwnerKind,
    /// Sanitized host name (e.g., "JPandas", "JDataFrame")
    pub name: String,
    /// Foreign name: the library path for modules, the class name for classes
    pub foreign_name: String,
    /// Declaring foreign module
    pub module: String,
    /// Sanitized doc
    pub doc: String,
    /// Statements to run before any binding is invoked, in order
    pub imports: Vec<ImportStatement>,
    /// Bindings in synthesis order
    pub bindings: Vec<GeneratedBinding>,
}

impl BindingOwner {
    /// Create an owner whose only import is the library itself
    pub fn new(
        kind: OwnerKind,
        name: impl Into<String>,
        foreign_name: impl Into<String>,
        module: impl Into<String>,
        library: &str,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            foreign_name: foreign_name.into(),
            module: module.into(),
            doc: String::new(),
            imports: vec![ImportStatement::Module {
                module: library.to_string(),
            }],
            bindings: Vec::new(),
        }
    }

    /// Add an import unless it is already present
    pub fn require_import(&mut self, statement: ImportStatement) {
        if !self.imports.contains(&statement) {
            self.imports.push(statement);
        }
    }

    /// All import statements as one foreign script
    pub fn import_script(&self) -> String {
        self.imports
            .iter()
            .map(ImportStatement::to_source)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Bindings forwarding to the given foreign callable
    pub fn bindings_for<'a>(&'a self, callable: &'a str) -> impl Iterator<Item = &'a GeneratedBinding> {
        self.bindings
            .iter()
            .filter(move |b| b.call_target.callable() == callable)
    }
}

/// Why a symbol contributed no binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Name is empty, `_`, a host keyword or not an identifier
    InvalidName,
    /// The foreign initializer, handled by the wrapper's construction path
    Constructor,
    /// Sanitized owner name already taken by another owner
    OwnerCollision,
    /// An overload with the same name, arity and shape was already emitted
    DuplicateSignature { arity: usize, keyword_tail: bool },
}

/// Diagnostic record for a dropped symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSymbol {
    pub owner: String,
    pub symbol: String,
    pub reason: SkipReason,
}

/// Everything synthesized for one library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingPlan {
    /// Library path the plan was synthesized for
    pub library: String,
    /// Module owner first, then one owner per deduplicated class
    pub owners: Vec<BindingOwner>,
    /// Dropped symbols (diagnostic only)
    pub skipped: Vec<SkippedSymbol>,
}

impl BindingPlan {
    /// Create an empty plan
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            owners: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Namespace segment derived from the library ("matplotlib.pyplot" -> "matplotlib_pyplot")
    pub fn package_segment(&self) -> String {
        self.library.replace('.', "_")
    }

    /// Look up an owner by its sanitized name
    pub fn owner(&self, name: &str) -> Option<&BindingOwner> {
        self.owners.iter().find(|o| o.name == name)
    }

    /// The module-level owner
    pub fn module_owner(&self) -> Option<&BindingOwner> {
        self.owners.iter().find(|o| o.kind == OwnerKind::Module)
    }

    /// Total number of bindings across all owners
    pub fn binding_count(&self) -> usize {
        self.owners.iter().map(|o| o.bindings.len()).sum()
    }

    /// Iterate all bindings in owner order
    pub fn bindings(&self) -> impl Iterator<Item = &GeneratedBinding> {
        self.owners.iter().flat_map(|o| o.bindings.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(target: CallTarget, arity: usize, keyword_tail: bool) -> GeneratedBinding {
        GeneratedBinding {
            owner_kind: OwnerKind::Class,
            owner_name: "JDataFrame".into(),
            binding_name: "query".into(),
            arity,
            uses_keyword_tail: keyword_tail,
            requires_alias: target.alias().is_some(),
            call_target: target,
            doc: String::new(),
        }
    }

    #[test]
    fn test_call_target_paths() {
        let module = CallTarget::ModuleCall {
            module: "lib.viz".into(),
            callable: "plot".into(),
        };
        let aliased = CallTarget::AliasedCall {
            alias: "_pandas_io_parsers".into(),
            module: "pandas.io.parsers".into(),
            callable: "read_csv".into(),
        };
        let method = CallTarget::MethodCall {
            method: "head".into(),
        };

        assert_eq!(module.path(), "lib.viz.plot");
        assert_eq!(aliased.path(), "_pandas_io_parsers.read_csv");
        assert_eq!(aliased.alias(), Some("_pandas_io_parsers"));
        assert_eq!(method.to_string(), "self.head");
        assert_eq!(method.callable(), "head");
    }

    #[test]
    fn test_foreign_call() {
        let method = CallTarget::MethodCall {
            method: "query".into(),
        };
        assert_eq!(
            binding(method.clone(), 1, true).foreign_call("py_kwargs"),
            "self.query(arg0, **py_kwargs)"
        );
        assert_eq!(
            binding(method.clone(), 0, true).foreign_call("py_kwargs"),
            "self.query(**py_kwargs)"
        );
        assert_eq!(binding(method, 2, false).foreign_call("py_kwargs"), "self.query(arg0, arg1)");
    }

    #[test]
    fn test_import_statements() {
        let mut owner = BindingOwner::new(OwnerKind::Module, "JPandas", "pandas", "pandas", "pandas");
        let alias = ImportStatement::Alias {
            alias: "_pandas_io".into(),
            module: "pandas.io".into(),
        };
        owner.require_import(alias.clone());
        owner.require_import(alias);

        assert_eq!(owner.imports.len(), 2);
        assert_eq!(
            owner.import_script(),
            "import pandas\nimport importlib; _pandas_io = importlib.import_module('pandas.io')"
        );
    }

    #[test]
    fn test_call_target_serializes_tagged() {
        let json = serde_json::to_string(&CallTarget::MethodCall {
            method: "head".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"methodCall","method":"head"}"#);
    }
}
