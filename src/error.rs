//! Error types for schema assembly

use std::path::PathBuf;

use thiserror::Error;

use crate::declaration::TypeKind;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema build errors
///
/// Every variant aborts the build. Messages always name the offending
/// type, field, or interface.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Duplicate type name: '{name}' is already registered as {existing} (attempted {attempted})")]
    DuplicateName {
        name: String,
        existing: TypeKind,
        attempted: TypeKind,
    },

    #[error("Duplicate member: '{member}' is declared more than once on type '{type_name}'")]
    DuplicateMember { type_name: String, member: String },

    #[error("Unknown type: '{name}'{}", did_you_mean(.suggestion))]
    UnknownType {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Missing interface: type '{object}' implements '{interface}'{}", found_instead(.found))]
    MissingInterface {
        object: String,
        interface: String,
        found: Option<TypeKind>,
    },

    #[error("Incompatible field: '{type_name}.{field}' does not satisfy interface '{interface}' (expected {expected}, got {actual})")]
    IncompatibleField {
        type_name: String,
        interface: String,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Unresolved type reference: field '{type_name}.{field}' references unknown type '{target}'{}", did_you_mean(.suggestion))]
    UnresolvedTypeReference {
        type_name: String,
        field: String,
        target: String,
        suggestion: Option<String>,
    },

    #[error("Invalid name: '{name}' ({reason})")]
    InvalidName { name: String, reason: String },

    #[error("Invalid type expression: '{0}'")]
    InvalidTypeExpression(String),

    #[error("Empty type: {kind} '{name}' declares no {}", members_word(.kind))]
    EmptyType { name: String, kind: TypeKind },

    #[error("Invalid root: {operation} root '{name}' {reason}")]
    InvalidRoot {
        operation: String,
        name: String,
        reason: String,
    },

    #[error("Failed to load {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl SchemaError {
    /// Whether this error comes from the declarations themselves rather than
    /// from the environment (files, config).
    pub fn is_declaration_error(&self) -> bool {
        !matches!(
            self,
            Self::Load { .. } | Self::Config(_) | Self::Io(_) | Self::Json(_) | Self::Toml(_)
        )
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(", did you mean '{}'?", s),
        None => String::new(),
    }
}

fn found_instead(found: &Option<TypeKind>) -> String {
    match found {
        Some(kind) => format!(", which is {} {}, not an interface", kind.article(), kind),
        None => String::from(", which is not registered"),
    }
}

fn members_word(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Enum => "values",
        _ => "fields",
    }
}
