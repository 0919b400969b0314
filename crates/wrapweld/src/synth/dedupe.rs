//! Class deduplication
//!
//! Foreign libraries re-export the same type under several module paths.
//! The resolver collapses those into one binding target per simple name.

use crate::ir::ClassDescriptor;
use crate::synth::SynthesisConfig;
use indexmap::IndexMap;
use tracing::debug;

/// Collapse classes sharing a simple name into one canonical entry
///
/// Classes from denied modules are dropped. Among duplicates, an entry
/// declared in the library's canonical module replaces a non-canonical one;
/// otherwise the first-seen entry is kept. Keys stay in first-insertion
/// order.
pub fn dedupe_classes(
    classes: Vec<ClassDescriptor>,
    library: &str,
    config: &SynthesisConfig,
) -> IndexMap<String, ClassDescriptor> {
    let canonical = config.canonical_module(library);
    let mut by_name: IndexMap<String, ClassDescriptor> = IndexMap::new();

    for class in classes {
        if config.is_denied_module(&class.module) {
            debug!(class = %class.name, module = %class.module, "skip class from denied module");
            continue;
        }

        match by_name.get_mut(&class.name) {
            None => {
                by_name.insert(class.name.clone(), class);
            }
            Some(existing) => {
                if class.module == canonical && existing.module != canonical {
                    debug!(
                        class = %class.name,
                        replaced = %existing.module,
                        canonical = %class.module,
                        "prefer canonical class"
                    );
                    *existing = class;
                } else {
                    debug!(class = %class.name, module = %class.module, "drop duplicate class");
                }
            }
        }
    }

    by_name
}
