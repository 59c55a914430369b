//! Assembled schema
//!
//! The validated, immutable result of assembly. Field type references are
//! resolved to concrete identities, types keep registration order, and a
//! reference graph answers dependency queries.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::declaration::{EnumValue, FieldDeclaration, FieldType, TypeDeclaration, TypeKind};
use crate::diagnostics::Diagnostics;
use crate::names::BuiltinScalar;

/// Conventional root operation type names
pub const DEFAULT_QUERY_ROOT: &str = "Query";
pub const DEFAULT_MUTATION_ROOT: &str = "Mutation";

/// Identity of a declared type within one [`Schema`]: its registration index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a field's type reference resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTarget {
    Builtin(BuiltinScalar),
    Declared(TypeId),
}

/// Edge kinds in the reference graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Owner type has a field of the target type
    Field,
    /// Object declares the target interface
    Implements,
}

/// A field with its type reference resolved
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub(crate) declaration: FieldDeclaration,
    pub(crate) target: TypeTarget,
}

impl ResolvedField {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.declaration.ty
    }

    pub fn target(&self) -> TypeTarget {
        self.target
    }

    pub fn description(&self) -> Option<&str> {
        self.declaration.description.as_deref()
    }

    pub fn deprecated(&self) -> Option<&str> {
        self.declaration.deprecated.as_deref()
    }
}

/// A declared type inside an assembled schema
#[derive(Debug, Clone)]
pub struct SchemaType {
    pub(crate) id: TypeId,
    pub(crate) declaration: TypeDeclaration,
    pub(crate) fields: Vec<ResolvedField>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) implementors: Vec<TypeId>,
}

impl SchemaType {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    pub fn kind(&self) -> TypeKind {
        self.declaration.kind()
    }

    pub fn description(&self) -> Option<&str> {
        self.declaration.description()
    }

    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn values(&self) -> &[EnumValue] {
        self.declaration.values()
    }

    /// Interfaces this object implements, in declaration order
    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    /// Objects implementing this interface, in registration order
    pub fn implementors(&self) -> &[TypeId] {
        &self.implementors
    }
}

/// Root operation types after resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedRoots {
    pub query: Option<TypeId>,
    pub mutation: Option<TypeId>,
}

/// The assembled, validated schema
#[derive(Debug, Clone)]
pub struct Schema {
    types: Vec<SchemaType>,
    by_name: HashMap<String, TypeId>,
    roots: ResolvedRoots,
    graph: DiGraph<TypeId, EdgeKind>,
    diagnostics: Diagnostics,
}

impl Schema {
    /// Only the assembler builds schemas; `types` must be in registration
    /// order with ids equal to their positions.
    pub(crate) fn new(types: Vec<SchemaType>, roots: ResolvedRoots) -> Self {
        let by_name = types
            .iter()
            .map(|t| (t.name().to_string(), t.id))
            .collect();

        let mut graph = DiGraph::with_capacity(types.len(), types.len() * 2);
        for ty in &types {
            graph.add_node(ty.id);
        }
        for ty in &types {
            let from = NodeIndex::new(ty.id.index());
            for field in &ty.fields {
                if let TypeTarget::Declared(target) = field.target {
                    graph.add_edge(from, NodeIndex::new(target.index()), EdgeKind::Field);
                }
            }
            for interface in &ty.interfaces {
                graph.add_edge(from, NodeIndex::new(interface.index()), EdgeKind::Implements);
            }
        }

        Self {
            types,
            by_name,
            roots,
            graph,
            diagnostics: Diagnostics::new(),
        }
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Diagnostics) {
        self.diagnostics = diagnostics;
    }

    /// Types in registration order
    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.iter()
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.by_name.get(name).map(|id| &self.types[id.index()])
    }

    /// Type by id. Ids are only handed out by this schema.
    pub fn ty(&self, id: TypeId) -> &SchemaType {
        &self.types[id.index()]
    }

    /// Name of a resolved target
    pub fn target_name(&self, target: TypeTarget) -> &str {
        match target {
            TypeTarget::Builtin(scalar) => scalar.as_str(),
            TypeTarget::Declared(id) => self.ty(id).name(),
        }
    }

    pub fn roots(&self) -> ResolvedRoots {
        self.roots
    }

    pub fn query_root(&self) -> Option<&SchemaType> {
        self.roots.query.map(|id| self.ty(id))
    }

    pub fn mutation_root(&self) -> Option<&SchemaType> {
        self.roots.mutation.map(|id| self.ty(id))
    }

    /// Whether the SDL can omit the `schema { ... }` block
    pub fn uses_conventional_roots(&self) -> bool {
        let query_ok = self
            .query_root()
            .map_or(true, |t| t.name() == DEFAULT_QUERY_ROOT);
        let mutation_ok = self
            .mutation_root()
            .map_or(true, |t| t.name() == DEFAULT_MUTATION_ROOT);
        query_ok && mutation_ok
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Declared types `name` refers to through fields or interfaces, in
    /// registration order
    pub fn references(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Declared types referring to `name`
    pub fn referrers(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(id) = self.by_name.get(name) else {
            return Vec::new();
        };
        let mut ids: Vec<TypeId> = self
            .graph
            .edges_directed(NodeIndex::new(id.index()), direction)
            .map(|edge| match direction {
                Direction::Outgoing => self.graph[edge.target()],
                Direction::Incoming => self.graph[edge.source()],
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids.into_iter().map(|id| self.ty(id).name()).collect()
    }

    /// Types reachable from the given roots.
    ///
    /// Follows field references and declared interfaces, and from an
    /// interface to every object implementing it.
    pub fn reachable_from(&self, roots: &[TypeId]) -> HashSet<TypeId> {
        let mut seen: HashSet<TypeId> = roots.iter().copied().collect();
        let mut queue: VecDeque<TypeId> = roots.iter().copied().collect();

        while let Some(id) = queue.pop_front() {
            let node = NodeIndex::new(id.index());
            let outgoing = self
                .graph
                .edges_directed(node, Direction::Outgoing)
                .map(|e| self.graph[e.target()]);
            let via_implementors = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .filter(|e| *e.weight() == EdgeKind::Implements)
                .map(|e| self.graph[e.source()]);

            for next in outgoing.chain(via_implementors) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }
}
