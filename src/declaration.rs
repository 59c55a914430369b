//! Type declarations
//!
//! Declarations are plain values built before the build phase runs. They are
//! handed to the [`TypeRegistry`](crate::registry::TypeRegistry), which owns
//! them from then on; nothing about a declaration changes after construction.
//!
//! ```
//! use codefirst_schema::{FieldDeclaration, FieldType, TypeDeclaration};
//!
//! let post = TypeDeclaration::object("Post")
//!     .implements("Node")
//!     .field(FieldDeclaration::new("id", FieldType::named("ID").required()))
//!     .field(FieldDeclaration::new("title", FieldType::named("String").required()))
//!     .build();
//!
//! assert_eq!(post.fields().len(), 2);
//! assert_eq!(post.interfaces(), ["Node".to_string()]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Object,
    Interface,
    Enum,
    Scalar,
}

impl TypeKind {
    /// The SDL keyword introducing a type of this kind
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Object => "type",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Scalar => "scalar",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Scalar => "scalar",
        }
    }

    pub(crate) fn article(&self) -> &'static str {
        match self {
            TypeKind::Object | TypeKind::Interface | TypeKind::Enum => "an",
            TypeKind::Scalar => "a",
        }
    }

    /// Whether declarations of this kind carry fields
    pub fn has_fields(&self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field Type
// =============================================================================

/// Reference to a named type with nullability and list wrapping.
///
/// Serialized in SDL notation (`String`, `ID!`, `[Post!]!`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldType {
    name: String,
    nullable: bool,
    list: bool,
    item_nullable: bool,
}

impl FieldType {
    /// A nullable reference to `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            list: false,
            item_nullable: true,
        }
    }

    /// A nullable list of nullable `name` items
    pub fn list_of(name: impl Into<String>) -> Self {
        Self {
            list: true,
            ..Self::named(name)
        }
    }

    /// Make the outermost type non-null
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Make list items non-null. No effect on non-list types.
    pub fn items_required(mut self) -> Self {
        if self.list {
            self.item_nullable = false;
        }
        self
    }

    /// Name of the referenced type, with all wrappers stripped
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    /// Item nullability; always `true` for non-list types
    pub fn is_item_nullable(&self) -> bool {
        self.item_nullable
    }

    /// Parse SDL notation. Nested lists are not supported.
    pub fn parse(expr: &str) -> Result<Self, SchemaError> {
        let invalid = || SchemaError::InvalidTypeExpression(expr.to_string());
        let trimmed = expr.trim();

        let (body, nullable) = match trimmed.strip_suffix('!') {
            Some(inner) => (inner.trim_end(), false),
            None => (trimmed, true),
        };

        let parsed = match body.strip_prefix('[') {
            Some(rest) => {
                let inner = rest.strip_suffix(']').ok_or_else(invalid)?.trim();
                let (item, item_nullable) = match inner.strip_suffix('!') {
                    Some(item) => (item.trim_end(), false),
                    None => (inner, true),
                };
                if item.is_empty() || item.contains(['[', ']', '!']) {
                    return Err(invalid());
                }
                Self {
                    name: item.to_string(),
                    nullable,
                    list: true,
                    item_nullable,
                }
            }
            None => {
                if body.is_empty() || body.contains(['[', ']', '!']) {
                    return Err(invalid());
                }
                Self {
                    name: body.to_string(),
                    nullable,
                    list: false,
                    item_nullable: true,
                }
            }
        };

        if parsed.name.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        Ok(parsed)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.list {
            write!(f, "[{}", self.name)?;
            if !self.item_nullable {
                f.write_str("!")?;
            }
            f.write_str("]")?;
        } else {
            f.write_str(&self.name)?;
        }
        if !self.nullable {
            f.write_str("!")?;
        }
        Ok(())
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}

// =============================================================================
// Fields and Enum Values
// =============================================================================

/// A field on an object or interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            deprecated: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the field deprecated with the given reason
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

/// A member of an enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecated: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

// =============================================================================
// Type Declaration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeBody {
    Object {
        fields: Vec<FieldDeclaration>,
        interfaces: Vec<String>,
    },
    Interface {
        fields: Vec<FieldDeclaration>,
    },
    Enum {
        values: Vec<EnumValue>,
    },
    Scalar,
}

/// A named object, interface, enum, or custom scalar declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    name: String,
    description: Option<String>,
    body: TypeBody,
}

impl TypeDeclaration {
    /// Start an object type declaration
    pub fn object(name: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    /// Start an interface type declaration
    pub fn interface(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Start an enum type declaration
    pub fn enumeration(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder {
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    /// Declare a custom scalar
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            body: TypeBody::Scalar,
        }
    }

    /// Attach a description to an already built declaration
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> TypeKind {
        match self.body {
            TypeBody::Object { .. } => TypeKind::Object,
            TypeBody::Interface { .. } => TypeKind::Interface,
            TypeBody::Enum { .. } => TypeKind::Enum,
            TypeBody::Scalar => TypeKind::Scalar,
        }
    }

    /// Fields in declaration order; empty for enums and scalars
    pub fn fields(&self) -> &[FieldDeclaration] {
        match &self.body {
            TypeBody::Object { fields, .. } | TypeBody::Interface { fields } => fields,
            TypeBody::Enum { .. } | TypeBody::Scalar => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Enum values in declaration order; empty for other kinds
    pub fn values(&self) -> &[EnumValue] {
        match &self.body {
            TypeBody::Enum { values } => values,
            _ => &[],
        }
    }

    /// Interfaces this object declares conformance to
    pub fn interfaces(&self) -> &[String] {
        match &self.body {
            TypeBody::Object { interfaces, .. } => interfaces,
            _ => &[],
        }
    }

    /// Names of all fields or enum values, in order
    pub(crate) fn member_names(&self) -> Vec<&str> {
        match &self.body {
            TypeBody::Enum { values } => values.iter().map(|v| v.name.as_str()).collect(),
            _ => self.fields().iter().map(|f| f.name.as_str()).collect(),
        }
    }
}

/// Builder for object declarations
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDeclaration>,
    interfaces: Vec<String>,
}

impl ObjectBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare conformance to an interface
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> TypeDeclaration {
        TypeDeclaration {
            name: self.name,
            description: self.description,
            body: TypeBody::Object {
                fields: self.fields,
                interfaces: self.interfaces,
            },
        }
    }
}

/// Builder for interface declarations
#[derive(Debug, Clone)]
pub struct InterfaceBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDeclaration>,
}

impl InterfaceBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> TypeDeclaration {
        TypeDeclaration {
            name: self.name,
            description: self.description,
            body: TypeBody::Interface {
                fields: self.fields,
            },
        }
    }
}

/// Builder for enum declarations
#[derive(Debug, Clone)]
pub struct EnumBuilder {
    name: String,
    description: Option<String>,
    values: Vec<EnumValue>,
}

impl EnumBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(mut self, value: EnumValue) -> Self {
        self.values.push(value);
        self
    }

    /// Add several plain values at once
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(EnumValue::new));
        self
    }

    pub fn build(self) -> TypeDeclaration {
        TypeDeclaration {
            name: self.name,
            description: self.description,
            body: TypeBody::Enum {
                values: self.values,
            },
        }
    }
}
