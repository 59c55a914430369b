//! Declaration Loading
//!
//! Reads declaration files from a directory tree. Each `*.json` or `*.toml`
//! file holds a `types` array:
//!
//! ```toml
//! [[types]]
//! name = "Node"
//! kind = "interface"
//! fields = [{ name = "id", type = "ID!" }]
//!
//! [[types]]
//! name = "Role"
//! kind = "enum"
//! values = ["ADMIN", { name = "GUEST", deprecated = "use MEMBER" }]
//! ```
//!
//! Files are visited in path order so the resulting declaration order, and
//! therefore every emitted artifact, does not depend on the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::declaration::{EnumValue, FieldDeclaration, TypeDeclaration, TypeKind};
use crate::error::{Result, SchemaError};

/// Supported declaration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Toml,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclarationFile {
    #[serde(default)]
    types: Vec<RawDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    name: String,
    kind: TypeKind,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    implements: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldDeclaration>,
    #[serde(default)]
    values: Vec<RawEnumValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEnumValue {
    Plain(String),
    Detailed(EnumValue),
}

impl From<RawEnumValue> for EnumValue {
    fn from(raw: RawEnumValue) -> Self {
        match raw {
            RawEnumValue::Plain(name) => EnumValue::new(name),
            RawEnumValue::Detailed(value) => value,
        }
    }
}

impl RawDeclaration {
    /// Reject members that make no sense for the declared kind
    fn into_declaration(self) -> std::result::Result<TypeDeclaration, String> {
        let misplaced = |what: &str| format!("{} '{}' cannot declare {}", self.kind, self.name, what);

        if self.kind != TypeKind::Object && !self.implements.is_empty() {
            return Err(misplaced("implemented interfaces"));
        }
        if !self.kind.has_fields() && !self.fields.is_empty() {
            return Err(misplaced("fields"));
        }
        if self.kind != TypeKind::Enum && !self.values.is_empty() {
            return Err(misplaced("enum values"));
        }

        let declaration = match self.kind {
            TypeKind::Object => {
                let builder = self
                    .implements
                    .into_iter()
                    .fold(TypeDeclaration::object(self.name), |b, i| b.implements(i));
                self.fields.into_iter().fold(builder, |b, f| b.field(f)).build()
            }
            TypeKind::Interface => self
                .fields
                .into_iter()
                .fold(TypeDeclaration::interface(self.name), |b, f| b.field(f))
                .build(),
            TypeKind::Enum => self
                .values
                .into_iter()
                .fold(TypeDeclaration::enumeration(self.name), |b, v| b.value(v.into()))
                .build(),
            TypeKind::Scalar => TypeDeclaration::scalar(self.name),
        };

        Ok(match self.description {
            Some(description) => declaration.with_description(description),
            None => declaration,
        })
    }
}

/// Parse declarations from file content. `origin` is used in error messages.
pub fn parse_declarations(
    content: &str,
    format: SourceFormat,
    origin: &Path,
) -> Result<Vec<TypeDeclaration>> {
    let load_error = |message: String| SchemaError::Load {
        path: origin.to_path_buf(),
        message,
    };

    let file: DeclarationFile = match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| load_error(e.to_string()))?,
        SourceFormat::Toml => toml::from_str(content).map_err(|e| load_error(e.to_string()))?,
    };

    file.types
        .into_iter()
        .map(|raw| raw.into_declaration().map_err(load_error))
        .collect()
}

/// Load a single declaration file
pub fn load_file(path: &Path) -> Result<Vec<TypeDeclaration>> {
    let format = SourceFormat::from_path(path).ok_or_else(|| SchemaError::Load {
        path: path.to_path_buf(),
        message: "unsupported file extension (expected .json or .toml)".to_string(),
    })?;
    let content = fs::read_to_string(path).map_err(|e| SchemaError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_declarations(&content, format, path)
}

/// Declaration files under `dir`, in path order
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SchemaError::Load {
            path: dir.to_path_buf(),
            message: "declaration directory does not exist".to_string(),
        });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry.map_err(|e| SchemaError::Load {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && SourceFormat::from_path(path).is_some() {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Load every declaration under `dir`, files in path order
pub fn load_from_directory(dir: &Path) -> Result<Vec<TypeDeclaration>> {
    let mut declarations = Vec::new();

    for path in discover(dir)? {
        let loaded = load_file(&path)?;
        debug!(path = %path.display(), types = loaded.len(), "loaded declaration file");
        declarations.extend(loaded);
    }

    info!(dir = %dir.display(), types = declarations.len(), "loaded declarations");
    Ok(declarations)
}
