//! Declaration tree
//!
//! All nodes live in a single arena owned by [`Tree`] and refer to each
//! other through [`NodeId`]s. A node's `parent` is a plain index back into
//! the arena and only answers lookups ("which container owns me", "am I
//! inside a function"); ownership of every node stays with the arena.
//!
//! The tree is built in one forward pass by the parser and is read-only
//! afterwards. Mutating accessors are therefore crate-private.

use crate::types::NativeType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Reserved name of the program entry point.
pub const ENTRY_POINT_NAME: &str = "main";

/// Stable index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A type as written in a function signature.
///
/// Names that are neither `none` nor a native type are kept verbatim. No
/// check is made that they ever resolve to a declared struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeRef {
    /// The "no value" type, spelled `none` in source
    Void,
    Native(NativeType),
    Named(String),
}

impl TypeRef {
    pub fn parse(text: &str) -> Self {
        match text {
            "none" => TypeRef::Void,
            _ => NativeType::from_name(text)
                .map_or_else(|| TypeRef::Named(text.to_string()), TypeRef::Native),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Native(native) => write!(f, "{}", native),
            TypeRef::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    Native,
    Struct,
}

/// An entry in a container's type registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    pub name: String,
    pub unsigned_capable: bool,
    pub kind: TypeKind,
    /// The `struct` declaration node; `None` for natives
    pub declaration: Option<NodeId>,
}

impl Type {
    pub fn native(native: NativeType) -> Self {
        Self {
            name: native.name().to_string(),
            unsigned_capable: native.is_unsigned_capable(),
            kind: TypeKind::Native,
            declaration: None,
        }
    }

    pub fn structure(name: &str, declaration: NodeId) -> Self {
        Self {
            name: name.to_string(),
            unsigned_capable: false,
            kind: TypeKind::Struct,
            declaration: Some(declaration),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub ty: TypeRef,
    pub name: String,
    /// Set when the source gave no name and `name` was synthesized
    pub unused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
}

impl FunctionSignature {
    /// A function taking nothing and returning nothing
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: Vec::new(),
            return_type: TypeRef::Void,
        }
    }

    pub fn entry_point() -> Self {
        Self {
            name: ENTRY_POINT_NAME.to_string(),
            parameters: Vec::new(),
            return_type: TypeRef::Native(NativeType::Int),
        }
    }

    pub fn unused_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.unused)
    }
}

/// An include request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Include {
    /// `#include "path"`
    Local(String),
    /// `#include <path>`
    Global(String),
}

impl Include {
    pub fn path(&self) -> &str {
        match self {
            Include::Local(path) | Include::Global(path) => path,
        }
    }
}

/// Ordered children plus the two uniqueness-checked registries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    statements: Vec<NodeId>,
    declarations: Vec<NodeId>,
    functions: BTreeMap<String, NodeId>,
    types: BTreeMap<String, Type>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container whose type registry already holds every native type
    pub fn with_native_types() -> Self {
        let mut container = Self::new();
        for native in NativeType::ALL {
            container
                .types
                .insert(native.name().to_string(), Type::native(native));
        }
        container
    }

    /// Inline statements in source order
    pub fn statements(&self) -> &[NodeId] {
        &self.statements
    }

    /// Function and struct declarations in declaration order
    pub fn declarations(&self) -> &[NodeId] {
        &self.declarations
    }

    pub fn function(&self, name: &str) -> Option<NodeId> {
        self.functions.get(name).copied()
    }

    pub fn lookup_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub(crate) fn push_statement(&mut self, id: NodeId) {
        self.statements.push(id);
    }

    /// Registers a function. On a name clash the registry is left untouched
    /// and the id already holding the name is returned.
    pub(crate) fn declare_function(&mut self, name: &str, id: NodeId) -> Result<(), NodeId> {
        if let Some(existing) = self.functions.get(name) {
            return Err(*existing);
        }
        self.functions.insert(name.to_string(), id);
        self.declarations.push(id);
        Ok(())
    }

    /// Registers a struct type. On a name clash the existing entry is
    /// returned unchanged.
    pub(crate) fn declare_type(&mut self, ty: Type) -> Result<(), Type> {
        if let Some(existing) = self.types.get(&ty.name) {
            return Err(existing.clone());
        }
        if let Some(declaration) = ty.declaration {
            self.declarations.push(declaration);
        }
        self.types.insert(ty.name.clone(), ty);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLevel {
    pub body: Container,
    pub entry_point: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub signature: FunctionSignature,
    pub body: Container,
    /// Trailing comment from the header line
    pub comment: Option<String>,
    pub is_entry_point: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDecl {
    pub name: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    TopLevel(TopLevel),
    Function(Function),
    Struct(StructDecl),
    Comment(String),
    Directive(Include),
    /// Opaque target-language statement
    Command(String),
    Return(Option<String>),
}

impl NodeKind {
    pub fn container(&self) -> Option<&Container> {
        match self {
            NodeKind::TopLevel(top) => Some(&top.body),
            NodeKind::Function(func) => Some(&func.body),
            _ => None,
        }
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        match self {
            NodeKind::TopLevel(top) => Some(&mut top.body),
            NodeKind::Function(func) => Some(&mut func.body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// 1-based source line; `None` for the synthetic root
    pub line: Option<u32>,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// Arena of nodes rooted at a single [`TopLevel`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        let root = Node {
            line: None,
            parent: None,
            kind: NodeKind::TopLevel(TopLevel {
                body: Container::with_native_types(),
                entry_point: None,
            }),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids are only handed out by this tree, so indexing cannot miss.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn container(&self, id: NodeId) -> Option<&Container> {
        self.get(id).and_then(|node| node.kind.container())
    }

    pub fn function(&self, id: NodeId) -> Option<&Function> {
        match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Function(func)) => Some(func),
            _ => None,
        }
    }

    pub fn entry_point(&self) -> Option<NodeId> {
        match &self.node(self.root()).kind {
            NodeKind::TopLevel(top) => top.entry_point,
            _ => None,
        }
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).and_then(|node| node.parent),
        }
    }

    /// Nearest function containing `id`, or `id` itself when it is one
    pub fn enclosing_function(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|candidate| self.function(*candidate).is_some())
    }

    /// Looks `name` up in the type registry of `scope` and then of every
    /// enclosing container.
    pub fn resolve_type(&self, scope: NodeId, name: &str) -> Option<&Type> {
        std::iter::once(scope)
            .chain(self.ancestors(scope))
            .filter_map(|id| self.container(id))
            .find_map(|container| container.lookup_type(name))
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, line: Option<u32>, parent: NodeId) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            line,
            parent: Some(parent),
            kind,
        });
        id
    }

    pub(crate) fn container_mut(&mut self, id: NodeId) -> Option<&mut Container> {
        self.nodes
            .get_mut(id.index())
            .and_then(|node| node.kind.container_mut())
    }

    pub(crate) fn set_entry_point(&mut self, id: NodeId) {
        if let NodeKind::TopLevel(top) = &mut self.nodes[0].kind {
            top.entry_point = Some(id);
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Tree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|node| node.parent);
        Some(current)
    }
}
