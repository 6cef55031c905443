//! Indentation-driven tree builder
//!
//! Nesting comes from leading tabs only. The parser keeps a stack of open
//! containers whose bottom is always the top-level scope; a line at depth
//! `d` first closes every container above `d + 1`, and must then sit at
//! exactly the depth of the innermost open container. Function headers
//! push a new container, everything else is a statement of the current one.

pub mod errors;
pub mod signature;
pub mod statements;

use crate::lexer::{ClassifiedLine, Lexer, LineKind, UnrecognizedLine};
use crate::tree::{Function, FunctionSignature, NodeId, NodeKind, Tree, ENTRY_POINT_NAME};
use log::debug;
use tabc_common::SourceLocation;

pub use errors::ParseError;
pub use signature::{parse_header, Header, HeaderError};
pub use statements::{parse_statement, Statement};

/// Builds a [`Tree`] from source text in a single forward pass.
pub struct Parser<'a> {
    source: &'a str,
    filename: String,
    tree: Tree,
    stack: Vec<NodeId>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let tree = Tree::new();
        let root = tree.root();
        Self {
            source,
            filename: "<input>".to_string(),
            tree,
            stack: vec![root],
        }
    }

    /// Name used in error locations
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        self
    }

    pub fn parse(mut self) -> Result<Tree, ParseError> {
        for line in Lexer::new(self.source) {
            let line = line.map_err(|UnrecognizedLine { index, raw }| ParseError::Line {
                location: self.location(index),
                text: raw.trim_end().to_string(),
            })?;
            self.handle_line(&line)?;
        }

        self.pop_to(0)?;
        Ok(self.tree)
    }

    fn handle_line(&mut self, line: &ClassifiedLine<'_>) -> Result<(), ParseError> {
        match line.kind {
            LineKind::Blank => Ok(()),
            LineKind::Comment(message) => {
                self.push_leaf(line, NodeKind::Comment(message.to_string()));
                Ok(())
            }
            LineKind::Action {
                payload,
                trailing_comment,
            } => {
                self.pop_to(line.depth)?;

                let expected = self.stack.len() - 1;
                if line.depth != expected {
                    return Err(ParseError::IndentationSkip {
                        location: self.location(line.index),
                        text: line.raw.trim_end().to_string(),
                        depth: line.depth,
                        expected,
                    });
                }

                let header = parse_header(payload).map_err(|err| {
                    let location = self.location(line.index);
                    let text = line.raw.trim_end().to_string();
                    match err {
                        HeaderError::ParameterFormat => ParseError::ParameterFormat { location, text },
                        HeaderError::MissingColon => ParseError::MissingColon { location, text },
                    }
                })?;

                match header {
                    Some(Header::EntryPoint) => self.open_entry_point(line, trailing_comment),
                    Some(Header::Function(signature)) => {
                        if signature.name == ENTRY_POINT_NAME {
                            self.check_entry_point_free(line)?;
                        }
                        self.open_function(line, signature, trailing_comment, false);
                        Ok(())
                    }
                    None => self.dispatch_statement(line, payload, trailing_comment),
                }
            }
        }
    }

    fn open_entry_point(
        &mut self,
        line: &ClassifiedLine<'_>,
        trailing_comment: Option<&str>,
    ) -> Result<(), ParseError> {
        if self.current() != self.tree.root() {
            return Err(ParseError::NestedEntryPoint {
                location: self.location(line.index),
                text: line.raw.trim_end().to_string(),
            });
        }
        self.check_entry_point_free(line)?;

        let id = self.open_function(line, FunctionSignature::entry_point(), trailing_comment, true);
        self.tree.set_entry_point(id);
        Ok(())
    }

    /// At top level the entry point name may only be defined once,
    /// whichever header form introduces it.
    fn check_entry_point_free(&self, line: &ClassifiedLine<'_>) -> Result<(), ParseError> {
        let root = self.tree.root();
        if self.current() != root {
            return Ok(());
        }

        let existing = self.tree.entry_point().or_else(|| {
            self.tree
                .container(root)
                .and_then(|top| top.function(ENTRY_POINT_NAME))
        });
        match existing {
            Some(existing) => Err(ParseError::DuplicateEntryPoint {
                location: self.location(line.index),
                original: self.node_location(existing),
                text: line.raw.trim_end().to_string(),
            }),
            None => Ok(()),
        }
    }

    fn open_function(
        &mut self,
        line: &ClassifiedLine<'_>,
        signature: FunctionSignature,
        trailing_comment: Option<&str>,
        is_entry_point: bool,
    ) -> NodeId {
        let parent = self.current();
        debug!(
            "line {}: opening function {} at depth {}",
            line.index + 1,
            signature.name,
            line.depth
        );
        let id = self.tree.alloc(
            NodeKind::Function(Function {
                signature,
                body: Default::default(),
                comment: trailing_comment.map(str::to_string),
                is_entry_point,
            }),
            Some(self.line_number(line.index)),
            parent,
        );
        self.stack.push(id);
        id
    }

    /// Closes containers until `depth` is the innermost open depth. Each
    /// closed function (other than the entry point) is registered in the
    /// container that becomes current.
    fn pop_to(&mut self, depth: usize) -> Result<(), ParseError> {
        while depth < self.stack.len() - 1 {
            let Some(closed) = self.stack.pop() else {
                break;
            };
            let owner = self.current();

            let Some(func) = self.tree.function(closed) else {
                continue;
            };
            if func.is_entry_point {
                debug!("closing {}", ENTRY_POINT_NAME);
                continue;
            }
            let name = func.signature.name.clone();

            let registered = self
                .tree
                .container_mut(owner)
                .map(|container| container.declare_function(&name, closed));

            if let Some(Err(existing)) = registered {
                return Err(ParseError::DuplicateFunction {
                    name,
                    location: self.node_location(closed),
                    original: self.node_location(existing),
                    text: self.node_text(closed),
                });
            }
            debug!("closing function {} into {}", name, owner);
        }
        Ok(())
    }

    pub(crate) fn push_leaf(&mut self, line: &ClassifiedLine<'_>, kind: NodeKind) {
        let scope = self.current();
        let id = self.tree.alloc(kind, Some(self.line_number(line.index)), scope);
        if let Some(container) = self.tree.container_mut(scope) {
            container.push_statement(id);
        }
    }

    /// Innermost open container
    pub(crate) fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    pub(crate) fn line_number(&self, index: usize) -> u32 {
        u32::try_from(index + 1).unwrap_or(u32::MAX)
    }

    pub(crate) fn location(&self, index: usize) -> SourceLocation {
        SourceLocation::from_line_index(&self.filename, index)
    }

    fn node_location(&self, id: NodeId) -> SourceLocation {
        let line = self.tree.node(id).line.unwrap_or(0);
        SourceLocation::new(&self.filename, line, 1)
    }

    /// Raw source line a node was parsed from
    fn node_text(&self, id: NodeId) -> String {
        self.tree
            .node(id)
            .line
            .and_then(|line| self.source.lines().nth(line.saturating_sub(1) as usize))
            .map(|raw| raw.trim_end().to_string())
            .unwrap_or_default()
    }
}
