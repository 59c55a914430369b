//! Artifact Emission
//!
//! Renders an assembled [`Schema`] into text artifacts:
//! - `sdl`: the schema-description document (GraphQL SDL)
//! - `descriptor`: the type-descriptor document (JSON)
//! - `typescript`: static typings for TypeScript consumers
//!
//! Every emitter is a pure function of the schema and its options. Output
//! never depends on hash-map iteration order or the clock, so re-emitting an
//! unchanged schema is byte-identical.

pub mod descriptor;
pub mod sdl;
pub mod typescript;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::schema::Schema;

/// Artifacts the emitter can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Sdl,
    Descriptor,
    TypeScript,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Sdl => "sdl",
            ArtifactKind::Descriptor => "descriptor",
            ArtifactKind::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering options shared by the emitters
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// JSON layout for the descriptor
    pub format: OutputFormat,
    /// Custom scalar name -> TypeScript type
    pub scalars: BTreeMap<String, String>,
}

/// Render one artifact
pub fn emit(kind: ArtifactKind, schema: &Schema, options: &EmitOptions) -> Result<String> {
    match kind {
        ArtifactKind::Sdl => Ok(sdl::emit_sdl(schema)),
        ArtifactKind::Descriptor => descriptor::emit_descriptor(schema, options.format),
        ArtifactKind::TypeScript => Ok(typescript::emit_typescript(schema, &options.scalars)),
    }
}
