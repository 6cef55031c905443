//! Tab C Transpiler - Frontend
//!
//! This crate turns the indentation-sensitive pseudo-language into C:
//! - Lexer: classifies each source line by indentation and shape
//! - Parser: tracks open scopes and builds the declaration tree
//! - Tree: arena of functions, declarations and opaque statements
//! - Codegen: writes the tree back out as braced, hoisted C

pub mod lexer;
pub mod parser;
pub mod tree;
pub mod types;
pub mod codegen;

pub use lexer::{classify_line, ClassifiedLine, Lexer, LineKind};
pub use parser::{ParseError, Parser};
pub use tree::{
    Container, Function, FunctionSignature, Include, Node, NodeId, NodeKind,
    Parameter, Tree, Type, TypeKind, TypeRef,
};
pub use types::NativeType;
pub use codegen::{CodeGenerator, GeneratorOptions};

use tabc_common::CompilerError;

/// Parse source text into a declaration tree
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    Parser::new(source).parse()
}

/// Emit C for a finished tree with default options
pub fn generate(tree: &Tree) -> String {
    CodeGenerator::new(tree).generate()
}

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse source code, naming `filename` in any error location
    pub fn parse_source(source: &str, filename: &str) -> Result<Tree, CompilerError> {
        let tree = Parser::new(source).with_filename(filename).parse()?;
        Ok(tree)
    }

    /// Parse and generate in one go
    pub fn transpile(
        source: &str,
        filename: &str,
        options: GeneratorOptions,
    ) -> Result<String, CompilerError> {
        let tree = Self::parse_source(source, filename)?;
        Ok(CodeGenerator::with_options(&tree, options).generate())
    }
}
