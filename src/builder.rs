//! Schema Builder
//!
//! An explicit build context. Declarations are collected first and only
//! registered when [`SchemaBuilder::build`] runs, so independent builds never
//! share state.
//!
//! ```
//! use codefirst_schema::{FieldDeclaration, FieldType, SchemaBuilder, TypeDeclaration};
//!
//! let schema = SchemaBuilder::new()
//!     .declare(
//!         TypeDeclaration::object("Query")
//!             .field(FieldDeclaration::new("hello", FieldType::named("String").required()))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.query_root().map(|t| t.name()), Some("Query"));
//! ```

use std::path::Path;

use tracing::debug;

use crate::assembler::{RootOperations, SchemaAssembler};
use crate::declaration::TypeDeclaration;
use crate::error::Result;
use crate::loader;
use crate::registry::TypeRegistry;
use crate::schema::Schema;

#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    declarations: Vec<TypeDeclaration>,
    roots: RootOperations,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, declaration: TypeDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn declare_all<I>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = TypeDeclaration>,
    {
        self.declarations.extend(declarations);
        self
    }

    /// Add every declaration found under `dir`
    pub fn load_dir(self, dir: &Path) -> Result<Self> {
        Ok(self.declare_all(loader::load_from_directory(dir)?))
    }

    pub fn roots(mut self, roots: RootOperations) -> Self {
        self.roots = roots;
        self
    }

    pub fn declarations(&self) -> &[TypeDeclaration] {
        &self.declarations
    }

    /// Register the collected declarations in order
    pub fn registry(&self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry.register_all(self.declarations.iter().cloned())?;
        Ok(registry)
    }

    /// Register, check and assemble
    pub fn build(&self) -> Result<Schema> {
        let registry = self.registry()?;
        debug!(types = registry.len(), "assembling schema");
        SchemaAssembler::new(&registry)
            .with_roots(self.roots.clone())
            .assemble()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{FieldDeclaration, FieldType};
    use crate::error::SchemaError;

    fn node() -> TypeDeclaration {
        TypeDeclaration::interface("Node")
            .field(FieldDeclaration::new("id", FieldType::named("ID").required()))
            .build()
    }

    #[test]
    fn test_builds_are_independent() {
        let first = SchemaBuilder::new().declare(node()).build().unwrap();
        let second = SchemaBuilder::new().declare(node()).build().unwrap();
        assert_eq!(first.type_names(), second.type_names());
    }

    #[test]
    fn test_duplicate_surfaces_at_build() {
        let builder = SchemaBuilder::new().declare(node()).declare(node());
        assert_eq!(builder.declarations().len(), 2);
        assert!(matches!(builder.build(), Err(SchemaError::DuplicateName { .. })));
    }

    #[test]
    fn test_explicit_roots() {
        let schema = SchemaBuilder::new()
            .declare(
                TypeDeclaration::object("RootQuery")
                    .field(FieldDeclaration::new("ping", FieldType::named("Boolean")))
                    .build(),
            )
            .roots(RootOperations {
                query: Some("RootQuery".to_string()),
                mutation: None,
            })
            .build()
            .unwrap();

        assert_eq!(schema.query_root().map(|t| t.name()), Some("RootQuery"));
        assert!(!schema.uses_conventional_roots());
    }
}
