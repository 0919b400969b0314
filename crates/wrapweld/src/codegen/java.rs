//! Java wrapper generator
//!
//! Renders one [`BindingOwner`] as a Java compilation unit that forwards
//! every binding to the embedded interpreter.

use crate::codegen::EmitConfig;
use crate::ir::{BindingOwner, GeneratedBinding, OwnerKind};

/// Name the keyword map is bound to on the foreign side
const PY_KWARGS: &str = "py_kwargs";

/// Generator for Java wrapper classes
pub struct JavaGenerator<'a> {
    owner: &'a BindingOwner,
    package: &'a str,
    config: &'a EmitConfig,
}

impl<'a> JavaGenerator<'a> {
    /// Create a generator for one owner in the given package
    pub fn new(owner: &'a BindingOwner, package: &'a str, config: &'a EmitConfig) -> Self {
        Self {
            owner,
            package,
            config,
        }
    }

    /// File name for the generated unit
    pub fn file_name(&self) -> String {
        format!("{}.java", self.owner.name)
    }

    /// Generate the complete compilation unit
    pub fn generate(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "// Generated by wrapweld for {} - do not edit\n",
            self.owner.foreign_name
        ));
        output.push_str(&format!("package {};\n\n", self.package));

        let header = match self.owner.kind {
            OwnerKind::Module => format!("Wrapper for foreign module: {}", self.owner.foreign_name),
            OwnerKind::Class => format!(
                "Wrapper for foreign class: {} (module: {})",
                self.owner.foreign_name, self.owner.module
            ),
        };
        let mut class_doc = header;
        if self.owner.kind == OwnerKind::Class && !self.owner.doc.is_empty() {
            class_doc.push_str("\n\n");
            class_doc.push_str(&self.owner.doc);
        }
        output.push_str(&javadoc(&class_doc, ""));
        output.push_str(&format!("public class {} {{\n\n", self.owner.name));

        if self.owner.kind == OwnerKind::Class {
            output.push_str(&self.generate_receiver());
        }
        output.push_str(&self.generate_imports());

        for binding in &self.owner.bindings {
            output.push('\n');
            output.push_str(&self.generate_binding(binding));
        }

        output.push_str("}\n");
        output
    }

    /// Field, constructor and accessor for the wrapped foreign object
    fn generate_receiver(&self) -> String {
        let mut output = String::new();
        output.push_str("  private Object pyObj;\n\n");
        output.push_str(&format!("  public {}(Object pyObj) {{\n", self.owner.name));
        output.push_str("    this.pyObj = pyObj;\n");
        output.push_str("  }\n\n");
        output.push_str("  public Object py() {\n");
        output.push_str("    return this.pyObj;\n");
        output.push_str("  }\n\n");
        output
    }

    fn generate_imports(&self) -> String {
        let modifiers = match self.owner.kind {
            OwnerKind::Module => "protected static",
            OwnerKind::Class => "protected",
        };
        let mut output = javadoc("Foreign statements run before every call.", "  ");
        output.push_str(&format!("  {} String imports() {{\n", modifiers));
        output.push_str(&format!(
            "    return {};\n",
            java_string(&self.owner.import_script())
        ));
        output.push_str("  }\n");
        output
    }

    /// Generate one overload
    fn generate_binding(&self, binding: &GeneratedBinding) -> String {
        let mut output = String::new();

        if !binding.doc.is_empty() {
            output.push_str(&javadoc(&binding.doc, "  "));
        }

        let mut params: Vec<String> = binding
            .positional_args()
            .iter()
            .map(|a| format!("Object {}", a))
            .collect();
        if binding.uses_keyword_tail {
            params.push(format!("{} kwargs", self.config.keyword_map_type));
        }

        let modifiers = match binding.owner_kind {
            OwnerKind::Module => "public static",
            OwnerKind::Class => "public",
        };
        output.push_str(&format!(
            "  {} Object {}({}) {{\n",
            modifiers,
            binding.binding_name,
            params.join(", ")
        ));
        output.push_str(&format!(
            "    {} i = {};\n",
            self.config.interpreter_type, self.config.interpreter_accessor
        ));
        output.push_str("    i.exec(imports());\n");

        if binding.owner_kind == OwnerKind::Class {
            output.push_str("    i.set(\"self\", pyObj);\n");
        }

        if binding.uses_keyword_tail {
            for arg in binding.positional_args() {
                output.push_str(&format!("    i.set({}, {});\n", java_string(&arg), arg));
            }
            output.push_str(&format!(
                "    i.set({}, kwargs.py());\n",
                java_string(PY_KWARGS)
            ));
            output.push_str(&format!(
                "    i.exec({});\n",
                java_string(&format!("result = {}", binding.foreign_call(PY_KWARGS)))
            ));
            output.push_str(&format!(
                "    return i.getValue(\"result\", {}.class);\n",
                self.config.foreign_object_type
            ));
        } else {
            let mut call_args = vec![java_string(&binding.call_target.path())];
            call_args.extend(binding.positional_args());
            output.push_str(&format!("    return i.invoke({});\n", call_args.join(", ")));
        }

        output.push_str("  }\n");
        output
    }
}

/// Render a Javadoc block with the given indentation
fn javadoc(text: &str, indent: &str) -> String {
    let mut output = format!("{}/**\n", indent);
    for line in text.lines() {
        if line.is_empty() {
            output.push_str(&format!("{} *\n", indent));
        } else {
            output.push_str(&format!("{} * {}\n", indent, line));
        }
    }
    output.push_str(&format!("{} */\n", indent));
    output
}

/// Quote a string as a Java literal
pub fn java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CallableDescriptor, ClassDescriptor, LibraryDescriptor};
    use crate::synth::BindingSynthesizer;

    fn plan() -> crate::ir::BindingPlan {
        BindingSynthesizer::default().synthesize(
            LibraryDescriptor::new("pandas")
                .function(
                    CallableDescriptor::new("read_csv")
                        .with_params(&["path"])
                        .with_doc("Read a CSV file.")
                        .in_module("pandas.io.parsers.readers"),
                )
                .class(
                    ClassDescriptor::new("DataFrame", "pandas.core.frame")
                        .with_doc("Two-dimensional data.")
                        .method(
                            CallableDescriptor::new("query")
                                .with_params(&["self", "expr", "kwargs"])
                                .optional(1),
                        ),
                ),
        )
    }

    #[test]
    fn test_generate_module_wrapper() {
        let plan = plan();
        let config = EmitConfig::default();
        let gen = JavaGenerator::new(plan.module_owner().unwrap(), "demo.pandas", &config);
        let output = gen.generate();

        assert_eq!(gen.file_name(), "JPandas.java");
        assert!(output.contains("package demo.pandas;"));
        assert!(output.contains("public class JPandas {"));
        assert!(output.contains("protected static String imports()"));
        assert!(output.contains(
            "return \"import pandas\\nimport importlib; _pandas_io_parsers_readers = importlib.import_module('pandas.io.parsers.readers')\";"
        ));
        assert!(output.contains("public static Object read_csv(Object arg0) {"));
        assert!(output.contains("return i.invoke(\"_pandas_io_parsers_readers.read_csv\", arg0);"));
        assert!(output.contains("return i.invoke(\"_pandas_io_parsers_readers.read_csv\");"));
        assert!(output.contains("   * Read a CSV file."));
    }

    #[test]
    fn test_generate_class_wrapper() {
        let plan = plan();
        let config = EmitConfig::default();
        let output = JavaGenerator::new(plan.owner("JDataFrame").unwrap(), "demo.pandas", &config)
            .generate();

        assert!(output.contains("Wrapper for foreign class: DataFrame (module: pandas.core.frame)"));
        assert!(output.contains(" * Two-dimensional data."));
        assert!(output.contains("public JDataFrame(Object pyObj) {"));
        assert!(output.contains("public Object query(Object arg0, Object arg1) {"));
        assert!(output.contains("i.set(\"self\", pyObj);"));
        assert!(output.contains("return i.invoke(\"self.query\", arg0, arg1);"));
        assert!(output.contains(&format!(
            "public Object queryWithKwargs(Object arg0, {} kwargs) {{",
            config.keyword_map_type
        )));
        assert!(output.contains("i.exec(\"result = self.query(arg0, **py_kwargs)\");"));
    }

    #[test]
    fn test_doc_backslashes_never_reach_source() {
        let plan = BindingSynthesizer::default().synthesize(
            LibraryDescriptor::new("winlib").function(
                CallableDescriptor::new("f")
                    .with_doc(r"Path like C:\users\x; or \u002a/ closes")
                    .in_module("winlib"),
            ),
        );
        let config = EmitConfig::default();
        let output = JavaGenerator::new(plan.module_owner().unwrap(), "demo", &config).generate();

        assert!(!output.contains("\\u"));
        assert!(output.contains("   * Path like C:&#92;users&#92;x; or &#92;u002a/ closes"));
    }

    #[test]
    fn test_java_string_escapes() {
        assert_eq!(java_string("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }
}
