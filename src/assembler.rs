//! Schema Assembler
//!
//! Turns a registry into an immutable [`Schema`]:
//!
//! 1. Reject empty object/interface/enum declarations
//! 2. Resolve every field reference against the registry or built-in scalars
//! 3. Run the interface contract checker over all conformances
//! 4. Resolve root operation types
//! 5. Collect non-fatal diagnostics (unimplemented interfaces, unreachable
//!    types)
//!
//! Assembly only reads the registry, so it can be repeated and always yields
//! the same schema in registration order.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::checker::InterfaceChecker;
use crate::declaration::{TypeDeclaration, TypeKind};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, SchemaError};
use crate::names::BuiltinScalar;
use crate::registry::TypeRegistry;
use crate::schema::{
    ResolvedField, ResolvedRoots, Schema, SchemaType, TypeId, TypeTarget, DEFAULT_MUTATION_ROOT,
    DEFAULT_QUERY_ROOT,
};

/// Root operation type names. Unset roots fall back to a registered object
/// named `Query` / `Mutation`, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootOperations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation: Option<String>,
}

pub struct SchemaAssembler<'a> {
    registry: &'a TypeRegistry,
    roots: RootOperations,
}

impl<'a> SchemaAssembler<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            roots: RootOperations::default(),
        }
    }

    pub fn with_roots(mut self, roots: RootOperations) -> Self {
        self.roots = roots;
        self
    }

    /// Build the schema, failing on the first invalid declaration
    pub fn assemble(&self) -> Result<Schema> {
        for declaration in self.registry.iter() {
            check_not_empty(declaration)?;
        }

        let mut types = Vec::with_capacity(self.registry.len());
        for (index, declaration) in self.registry.iter().enumerate() {
            let fields = declaration
                .fields()
                .iter()
                .map(|field| {
                    Ok(ResolvedField {
                        declaration: field.clone(),
                        target: self.resolve(declaration.name(), &field.name, field.ty.name())?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            types.push(SchemaType {
                id: TypeId::new(index),
                declaration: declaration.clone(),
                fields,
                interfaces: Vec::new(),
                implementors: Vec::new(),
            });
        }

        let mut diagnostics = InterfaceChecker::new(self.registry).check_all()?;

        // The checker has confirmed every conformance names a registered interface
        for conformance in self.registry.conformances() {
            if let (Some(object), Some(interface)) = (
                self.registry.position(&conformance.object),
                self.registry.position(&conformance.interface),
            ) {
                types[object].interfaces.push(TypeId::new(interface));
                types[interface].implementors.push(TypeId::new(object));
            }
        }

        let roots = ResolvedRoots {
            query: self.resolve_root("query", self.roots.query.as_deref(), DEFAULT_QUERY_ROOT)?,
            mutation: self.resolve_root(
                "mutation",
                self.roots.mutation.as_deref(),
                DEFAULT_MUTATION_ROOT,
            )?,
        };

        let mut schema = Schema::new(types, roots);
        diagnostics.merge(collect_diagnostics(&schema));

        for item in diagnostics.warnings() {
            warn!(type_name = %item.type_name, code = %item.code, "{}", item.message);
        }
        info!(
            types = schema.len(),
            conformances = self.registry.conformances().len(),
            diagnostics = diagnostics.len(),
            "assembled schema"
        );

        schema.set_diagnostics(diagnostics);
        Ok(schema)
    }

    fn resolve(&self, owner: &str, field: &str, target: &str) -> Result<TypeTarget> {
        if let Some(scalar) = BuiltinScalar::from_name(target) {
            return Ok(TypeTarget::Builtin(scalar));
        }
        self.registry
            .position(target)
            .map(|index| TypeTarget::Declared(TypeId::new(index)))
            .ok_or_else(|| SchemaError::UnresolvedTypeReference {
                type_name: owner.to_string(),
                field: field.to_string(),
                target: target.to_string(),
                suggestion: self.registry.suggest(target),
            })
    }

    fn resolve_root(
        &self,
        operation: &str,
        explicit: Option<&str>,
        conventional: &str,
    ) -> Result<Option<TypeId>> {
        let Some(name) = explicit else {
            return Ok(self
                .registry
                .get(conventional)
                .filter(|decl| decl.kind() == TypeKind::Object)
                .and_then(|_| self.registry.position(conventional))
                .map(TypeId::new));
        };

        let invalid = |reason: String| SchemaError::InvalidRoot {
            operation: operation.to_string(),
            name: name.to_string(),
            reason,
        };
        match self.registry.get(name) {
            None => Err(invalid("is not registered".to_string())),
            Some(decl) if decl.kind() != TypeKind::Object => Err(invalid(format!(
                "must be an object type, found {} {}",
                decl.kind().article(),
                decl.kind()
            ))),
            Some(_) => Ok(self.registry.position(name).map(TypeId::new)),
        }
    }
}

fn check_not_empty(declaration: &TypeDeclaration) -> Result<()> {
    let kind = declaration.kind();
    let empty = match kind {
        TypeKind::Object | TypeKind::Interface => declaration.fields().is_empty(),
        TypeKind::Enum => declaration.values().is_empty(),
        TypeKind::Scalar => false,
    };
    if empty {
        return Err(SchemaError::EmptyType {
            name: declaration.name().to_string(),
            kind,
        });
    }
    Ok(())
}

fn collect_diagnostics(schema: &Schema) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    for ty in schema.types() {
        if ty.kind() == TypeKind::Interface && ty.implementors().is_empty() {
            diagnostics.unimplemented_interface(ty.name());
        }
    }

    let roots = schema.roots();
    let root_ids: Vec<TypeId> = roots.query.into_iter().chain(roots.mutation).collect();
    if let Some(query) = schema.query_root() {
        let reachable = schema.reachable_from(&root_ids);
        for ty in schema.types() {
            if !reachable.contains(&ty.id()) {
                diagnostics.unreachable_type(ty.name(), query.name());
            }
        }
    }

    diagnostics
}
