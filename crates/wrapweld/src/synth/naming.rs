//! Identifier sanitizing
//!
//! Pure mappings from foreign identifiers to host (Java) identifiers.

/// Suffix appended to names that clash with host built-in methods
pub const RESERVED_SUFFIX: &str = "_py";

/// The foreign initializer symbol; never becomes a method overload
pub const CONSTRUCTOR_SYMBOL: &str = "__init__";

/// Host built-in method names a binding must not override
pub const RESERVED_METHOD_NAMES: &[&str] = &[
    "equals",
    "hashCode",
    "toString",
    "getClass",
    "notify",
    "notifyAll",
    "wait",
    "finalize",
    "void",
];

/// Host language keywords and literals
pub const HOST_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "false",
    "null",
    "_",
];

/// Replace every character outside `[A-Za-z0-9_]` with `_`
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Append [`RESERVED_SUFFIX`] to names in [`RESERVED_METHOD_NAMES`]
pub fn reserved_guard(name: &str) -> String {
    if RESERVED_METHOD_NAMES.contains(&name) {
        format!("{}{}", name, RESERVED_SUFFIX)
    } else {
        name.to_string()
    }
}

/// Host name for a foreign callable: `sanitize(reserved_guard(name))`
pub fn binding_name(name: &str) -> String {
    sanitize(&reserved_guard(name))
}

/// Check whether a foreign name can become a host binding at all
///
/// Rejects empty names, the bare placeholder `_`, non-identifiers and host
/// keywords. The constructor symbol is not handled here.
pub fn is_valid_binding_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if name == "_" {
        return false;
    }
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    !HOST_KEYWORDS.contains(&name)
}

/// Host name for a foreign callable, if both the raw and the final name are usable
///
/// Sanitizing can collapse a valid foreign identifier (`é`, `$`) into the
/// bare placeholder `_`, so the result is validated again.
pub fn host_binding_name(name: &str) -> Option<String> {
    if !is_valid_binding_name(name) {
        return None;
    }
    let host = binding_name(name);
    is_valid_binding_name(&host).then_some(host)
}

/// Internal alias for a dotted module ("pandas.io.parsers" -> "_pandas_io_parsers")
pub fn module_alias(module: &str) -> String {
    format!("_{}", sanitize(&module.replace('.', "_")))
}

/// Uppercase the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
