//! Binding synthesis
//!
//! Turns a [`LibraryDescriptor`] into a [`BindingPlan`]: one module-level
//! owner for the library's free functions and one class-level owner per
//! deduplicated class, each carrying its overload set.
//!
//! Synthesis is pure and deterministic. It never fails; unusable symbols
//! are recorded in [`BindingPlan::skipped`] and logged at debug level.

pub mod config;
pub mod dedupe;
pub mod docs;
pub mod naming;
pub mod overload;

pub use config::SynthesisConfig;
pub use dedupe::dedupe_classes;
pub use docs::sanitize_doc;
pub use naming::{
    binding_name, capitalize, host_binding_name, is_valid_binding_name, module_alias,
    reserved_guard, sanitize,
};
pub use overload::{method_shapes, module_shapes, OverloadShape};

use crate::ir::{
    BindingOwner, BindingPlan, BindingSignature, CallTarget, CallableDescriptor, ClassDescriptor,
    GeneratedBinding, ImportStatement, LibraryDescriptor, OwnerKind, SkipReason, SkippedSymbol,
};
use std::collections::HashSet;
use tracing::debug;

/// Synthesizes binding plans from library metadata
#[derive(Debug, Clone, Default)]
pub struct BindingSynthesizer {
    config: SynthesisConfig,
}

impl BindingSynthesizer {
    /// Create a synthesizer with the given configuration
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize the full plan for one library
    pub fn synthesize(&self, library: LibraryDescriptor) -> BindingPlan {
        let mut plan = BindingPlan::new(&library.name);
        let mut owner_names = HashSet::new();
        let short_name = library.short_name().to_string();

        let module_owner = self.module_owner(
            &library.name,
            &short_name,
            library.functions,
            &mut plan.skipped,
        );
        owner_names.insert(module_owner.name.clone());
        plan.owners.push(module_owner);

        for (_, class) in dedupe_classes(library.classes, &library.name, &self.config) {
            let owner_name = format!("{}{}", self.config.owner_prefix, sanitize(&class.name));
            if !owner_names.insert(owner_name.clone()) {
                debug!(class = %class.name, owner = %owner_name, "skip colliding owner");
                plan.skipped.push(SkippedSymbol {
                    owner: owner_name,
                    symbol: class.qualified_name(),
                    reason: SkipReason::OwnerCollision,
                });
                continue;
            }
            let owner = self.class_owner(owner_name, &library.name, class, &mut plan.skipped);
            plan.owners.push(owner);
        }

        debug!(
            library = %plan.library,
            owners = plan.owners.len(),
            bindings = plan.binding_count(),
            skipped = plan.skipped.len(),
            "synthesized binding plan"
        );
        plan
    }

    fn module_owner(
        &self,
        library: &str,
        short_name: &str,
        functions: Vec<CallableDescriptor>,
        skipped: &mut Vec<SkippedSymbol>,
    ) -> BindingOwner {
        let name = format!("{}{}", self.config.owner_prefix, capitalize(&sanitize(short_name)));
        let mut owner = BindingOwner::new(OwnerKind::Module, name, library, library, library);
        owner.doc = format!("Wrapper for foreign module: {}", library);

        let mut seen = HashSet::new();
        for function in &functions {
            let Some(base) = host_binding_name(&function.name) else {
                record_skip(skipped, &owner.name, &function.name, SkipReason::InvalidName);
                continue;
            };

            let target = call_target(library, function);
            if let Some(alias) = target.alias() {
                owner.require_import(ImportStatement::Alias {
                    alias: alias.to_string(),
                    module: function.module.clone(),
                });
            }

            let shapes = module_shapes(function.total_params());
            self.push_overloads(&mut owner, &mut seen, skipped, function, &base, target, &shapes);
        }

        owner
    }

    fn class_owner(
        &self,
        name: String,
        library: &str,
        class: ClassDescriptor,
        skipped: &mut Vec<SkippedSymbol>,
    ) -> BindingOwner {
        let mut owner =
            BindingOwner::new(OwnerKind::Class, name, &class.name, &class.module, library);
        owner.doc = sanitize_doc(class.doc.as_deref(), self.config.doc_max_chars);

        let mut seen = HashSet::new();
        for method in &class.methods {
            if method.name == naming::CONSTRUCTOR_SYMBOL {
                record_skip(skipped, &owner.name, &method.name, SkipReason::Constructor);
                continue;
            }
            let Some(base) = host_binding_name(&method.name) else {
                record_skip(skipped, &owner.name, &method.name, SkipReason::InvalidName);
                continue;
            };

            let target = CallTarget::MethodCall {
                method: method.name.clone(),
            };
            let shapes = method_shapes(method.total_params(), method.optional_params());
            self.push_overloads(&mut owner, &mut seen, skipped, method, &base, target, &shapes);
        }

        owner
    }

    fn push_overloads(
        &self,
        owner: &mut BindingOwner,
        seen: &mut HashSet<BindingSignature>,
        skipped: &mut Vec<SkippedSymbol>,
        callable: &CallableDescriptor,
        base: &str,
        target: CallTarget,
        shapes: &[OverloadShape],
    ) {
        let doc = sanitize_doc(callable.doc.as_deref(), self.config.doc_max_chars);

        for shape in shapes {
            let binding_name = if shape.keyword_tail {
                format!("{}{}", base, self.config.kwargs_suffix)
            } else {
                base.to_string()
            };
            let binding = GeneratedBinding {
                owner_kind: owner.kind,
                owner_name: owner.name.clone(),
                binding_name,
                arity: shape.arity,
                uses_keyword_tail: shape.keyword_tail,
                requires_alias: target.alias().is_some(),
                call_target: target.clone(),
                doc: doc.clone(),
            };

            if !seen.insert(binding.signature()) {
                record_skip(
                    skipped,
                    &owner.name,
                    &callable.name,
                    SkipReason::DuplicateSignature {
                        arity: shape.arity,
                        keyword_tail: shape.keyword_tail,
                    },
                );
                continue;
            }
            owner.bindings.push(binding);
        }
    }
}

/// Resolve the foreign call target of a top-level callable
///
/// Callables declared in the library module itself are called through the
/// library import; anything declared elsewhere goes through a submodule alias.
pub fn call_target(library: &str, callable: &CallableDescriptor) -> CallTarget {
    if callable.module.is_empty() || callable.module == library {
        CallTarget::ModuleCall {
            module: library.to_string(),
            callable: callable.name.clone(),
        }
    } else {
        CallTarget::AliasedCall {
            alias: module_alias(&callable.module),
            module: callable.module.clone(),
            callable: callable.name.clone(),
        }
    }
}

fn record_skip(skipped: &mut Vec<SkippedSymbol>, owner: &str, symbol: &str, reason: SkipReason) {
    debug!(owner = %owner, symbol = %symbol, reason = ?reason, "skip unusable symbol");
    skipped.push(SkippedSymbol {
        owner: owner.to_string(),
        symbol: symbol.to_string(),
        reason,
    });
}
