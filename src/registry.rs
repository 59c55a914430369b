//! Type Registry
//!
//! Collects type declarations keyed by name, in the order they were submitted.
//! The registry is a plain value owned by whoever runs the build; there is no
//! process-wide registry.

use std::collections::HashMap;

use tracing::debug;

use crate::declaration::{TypeDeclaration, TypeKind};
use crate::error::{Result, SchemaError};
use crate::names::{self, BuiltinScalar};

/// Conformance of an object type to an interface, as declared
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceConformance {
    pub object: String,
    pub interface: String,
}

/// Registered declarations in submission order
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    /// Declarations in submission order
    types: Vec<TypeDeclaration>,
    /// name -> position in `types`
    index: HashMap<String, usize>,
    /// Conformance relations in submission order
    conformances: Vec<InterfaceConformance>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration.
    ///
    /// Fails with [`SchemaError::DuplicateName`] if the name is taken, by a
    /// built-in scalar or by an earlier declaration (identical or not).
    pub fn register(&mut self, declaration: TypeDeclaration) -> Result<()> {
        let name = declaration.name();
        names::validate_name(name)?;

        if BuiltinScalar::from_name(name).is_some() {
            return Err(SchemaError::DuplicateName {
                name: name.to_string(),
                existing: TypeKind::Scalar,
                attempted: declaration.kind(),
            });
        }
        if let Some(existing) = self.get(name) {
            return Err(SchemaError::DuplicateName {
                name: name.to_string(),
                existing: existing.kind(),
                attempted: declaration.kind(),
            });
        }

        validate_members(&declaration)?;

        for interface in declaration.interfaces() {
            self.conformances.push(InterfaceConformance {
                object: name.to_string(),
                interface: interface.clone(),
            });
        }

        debug!(
            name = %name,
            kind = %declaration.kind(),
            members = declaration.member_names().len(),
            "registered type"
        );

        self.index.insert(name.to_string(), self.types.len());
        self.types.push(declaration);
        Ok(())
    }

    /// Register several declarations, stopping at the first failure
    pub fn register_all<I>(&mut self, declarations: I) -> Result<()>
    where
        I: IntoIterator<Item = TypeDeclaration>,
    {
        for declaration in declarations {
            self.register(declaration)?;
        }
        Ok(())
    }

    /// Look up a declaration by name
    pub fn lookup(&self, name: &str) -> Result<&TypeDeclaration> {
        self.get(name).ok_or_else(|| SchemaError::UnknownType {
            name: name.to_string(),
            suggestion: self.suggest(name),
        })
    }

    pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of `name` in submission order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Declarations in submission order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.iter()
    }

    pub fn conformances(&self) -> &[InterfaceConformance] {
        &self.conformances
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Closest registered or built-in name to `name`
    pub fn suggest(&self, name: &str) -> Option<String> {
        let candidates = self
            .types
            .iter()
            .map(|t| t.name())
            .chain(BuiltinScalar::ALL.iter().map(|s| s.as_str()));
        names::suggest(name, candidates)
    }
}

/// Member names must be valid and unique within the declaration
fn validate_members(declaration: &TypeDeclaration) -> Result<()> {
    let is_enum = declaration.kind() == TypeKind::Enum;
    let mut seen = std::collections::HashSet::new();

    for member in declaration.member_names() {
        if is_enum {
            names::validate_enum_value(member)?;
        } else {
            names::validate_name(member)?;
        }
        if !seen.insert(member) {
            return Err(SchemaError::DuplicateMember {
                type_name: declaration.name().to_string(),
                member: member.to_string(),
            });
        }
    }

    let mut seen = std::collections::HashSet::new();
    for interface in declaration.interfaces() {
        if !seen.insert(interface.as_str()) {
            return Err(SchemaError::DuplicateMember {
                type_name: declaration.name().to_string(),
                member: interface.clone(),
            });
        }
    }

    Ok(())
}
