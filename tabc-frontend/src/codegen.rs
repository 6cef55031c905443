//! C code generation
//!
//! Walks a finished [`Tree`] once. Inside every container the function and
//! struct declarations are emitted first, in declaration order, followed by
//! the container's own statements in source order. At top level the entry
//! point comes last.

use crate::tree::{Function, Include, NodeId, NodeKind, Tree, TypeKind, TypeRef};
use log::debug;

const INDENT: &str = "\t";

/// Knobs that change the emitted text without changing its meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Emit `/* ... */` for line and trailing comments
    pub emit_comments: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
        }
    }
}

pub struct CodeGenerator<'t> {
    tree: &'t Tree,
    options: GeneratorOptions,
    output: String,
}

impl<'t> CodeGenerator<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self::with_options(tree, GeneratorOptions::default())
    }

    pub fn with_options(tree: &'t Tree, options: GeneratorOptions) -> Self {
        Self {
            tree,
            options,
            output: String::new(),
        }
    }

    pub fn generate(mut self) -> String {
        let root = self.tree.root();
        debug!("generating C for {} nodes", self.tree.node_count());

        self.emit_body(root, 0);
        if let Some(entry) = self.tree.entry_point() {
            self.emit_function(entry, 0);
        }

        self.output
    }

    fn emit_body(&mut self, scope: NodeId, indent: usize) {
        let tree = self.tree;
        let Some(container) = tree.container(scope) else {
            return;
        };

        for id in container.declarations() {
            self.emit_declaration(*id, indent);
        }
        for id in container.statements() {
            self.emit_statement(*id, indent);
        }
    }

    fn emit_declaration(&mut self, id: NodeId, indent: usize) {
        let tree = self.tree;
        match &tree.node(id).kind {
            NodeKind::Function(_) => self.emit_function(id, indent),
            NodeKind::Struct(decl) => {
                if let Some(comment) = &decl.comment {
                    self.emit_comment(comment, indent);
                }
                self.line(indent, &format!("struct {};", decl.name));
            }
            _ => self.emit_statement(id, indent),
        }
    }

    fn emit_function(&mut self, id: NodeId, indent: usize) {
        let tree = self.tree;
        let Some(func) = tree.function(id) else {
            return;
        };

        if let Some(comment) = &func.comment {
            self.emit_comment(comment, indent);
        }

        let header = self.function_header(id, func);
        self.line(indent, &header);
        self.line(indent, "{");

        for param in func.signature.unused_parameters() {
            self.line(indent + 1, &format!("(void){};", param.name));
        }
        self.emit_body(id, indent + 1);

        self.line(indent, "}");
        self.output.push('\n');
    }

    fn function_header(&self, id: NodeId, func: &Function) -> String {
        let scope = self.tree.node(id).parent.unwrap_or(id);
        let parameters = func
            .signature
            .parameters
            .iter()
            .map(|p| format!("{} {}", self.type_name(scope, &p.ty), p.name))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{} {}({})",
            self.type_name(scope, &func.signature.return_type),
            func.signature.name,
            parameters
        )
    }

    /// Named types declared with `struct` in an enclosing scope get their
    /// `struct` keyword back; any other name is written as it was given.
    fn type_name(&self, scope: NodeId, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named(name) => match self.tree.resolve_type(scope, name) {
                Some(resolved) if resolved.kind == TypeKind::Struct => format!("struct {}", name),
                _ => name.clone(),
            },
            other => other.to_string(),
        }
    }

    fn emit_statement(&mut self, id: NodeId, indent: usize) {
        let tree = self.tree;
        match &tree.node(id).kind {
            NodeKind::Comment(message) => self.emit_comment(message, indent),
            NodeKind::Directive(include) => {
                if include.path().is_empty() {
                    return;
                }
                // Preprocessor lines always start in the first column
                let text = match include {
                    Include::Local(path) => format!("#include \"{}\"", path),
                    Include::Global(path) => format!("#include <{}>", path),
                };
                self.line(0, &text);
            }
            NodeKind::Command(text) => {
                if !text.is_empty() {
                    self.line(indent, &format!("{};", text));
                }
            }
            NodeKind::Return(None) => self.line(indent, "return;"),
            NodeKind::Return(Some(value)) => self.line(indent, &format!("return {};", value)),
            NodeKind::Function(_) | NodeKind::Struct(_) => self.emit_declaration(id, indent),
            NodeKind::TopLevel(_) => {}
        }
    }

    fn emit_comment(&mut self, message: &str, indent: usize) {
        if self.options.emit_comments && !message.is_empty() {
            self.line(indent, &format!("/* {} */", message));
        }
    }

    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn generate(source: &str) -> String {
        let tree = Parser::new(source).parse().unwrap();
        CodeGenerator::new(&tree).generate()
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(generate(""), "");
    }

    #[test]
    fn test_void_function_without_parameters() {
        assert_eq!(generate("tick:\n\tC::> frame++\n"), "void tick()\n{\n\tframe++;\n}\n\n");
    }

    #[test]
    fn test_return_forms() {
        assert_eq!(
            generate("stop:\n\treturn\nvalue -> int:\n\treturn 42\n"),
            "void stop()\n{\n\treturn;\n}\n\nint value()\n{\n\treturn 42;\n}\n\n"
        );
    }

    #[test]
    fn test_discard_statements_come_first() {
        assert_eq!(
            generate("greet(string, int count):\n\tC::> show(count)\n"),
            "void greet(string param_0_unused_, int count)\n{\n\t(void)param_0_unused_;\n\tshow(count);\n}\n\n"
        );
    }

    #[test]
    fn test_empty_payloads_are_skipped() {
        assert_eq!(
            generate("#\nC::import\nf:\n\tC::>\n"),
            "void f()\n{\n}\n\n"
        );
    }

    #[test]
    fn test_directives_are_unindented() {
        assert_eq!(
            generate("f:\n\tC::import local inner.h\n"),
            "void f()\n{\n#include \"inner.h\"\n}\n\n"
        );
    }

    #[test]
    fn test_declarations_hoisted_within_parent() {
        let source = "outer:\n\tC::> before()\n\tinner:\n\t\treturn\n\tC::> after()\n";
        assert_eq!(
            generate(source),
            "void outer()\n{\n\tvoid inner()\n\t{\n\t\treturn;\n\t}\n\n\tbefore();\n\tafter();\n}\n\n"
        );
    }

    #[test]
    fn test_struct_parameters_get_struct_keyword() {
        assert_eq!(
            generate("struct Rect\narea(Rect r) -> long:\n\treturn 0\n"),
            "struct Rect;\nlong area(struct Rect r)\n{\n\treturn 0;\n}\n\n"
        );
    }

    #[test]
    fn test_comments_can_be_disabled() {
        let tree = Parser::new("# header\nmain: # entry\n\treturn 0 # ok\n")
            .parse()
            .unwrap();

        let with = CodeGenerator::new(&tree).generate();
        assert_eq!(
            with,
            "/* header */\n/* entry */\nint main()\n{\n\t/* ok */\n\treturn 0;\n}\n\n"
        );

        let without = CodeGenerator::with_options(
            &tree,
            GeneratorOptions {
                emit_comments: false,
            },
        )
        .generate();
        assert_eq!(without, "int main()\n{\n\treturn 0;\n}\n\n");
    }
}
