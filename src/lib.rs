//! Code-First Schema Builder
//!
//! Builds a GraphQL schema from type declarations written in code (or loaded
//! from declaration files) and emits it as SDL, a JSON type-descriptor
//! document, and optional TypeScript typings.
//!
//! ## Pipeline
//!
//! ```text
//! declarations ──► TypeRegistry ──► InterfaceChecker ──► SchemaAssembler ──► Schema
//!  (code/files)    (unique names,   (covariant field     (resolve refs,        │
//!                   conformances)    contracts)           roots, diagnostics)  │
//!                                                                              ▼
//!                                               ArtifactSet::render ──► write / check
//!                                               (sdl, descriptor, typescript)
//! ```
//!
//! Every stage is deterministic: types keep registration order and no
//! output depends on hash iteration or the clock. Rebuilding unchanged
//! declarations produces byte-identical artifacts.
//!
//! ## Example
//!
//! ```
//! use codefirst_schema::{emit, FieldDeclaration, FieldType, SchemaBuilder, TypeDeclaration};
//!
//! let schema = SchemaBuilder::new()
//!     .declare(
//!         TypeDeclaration::interface("Node")
//!             .field(FieldDeclaration::new("id", FieldType::named("ID").required()))
//!             .build(),
//!     )
//!     .declare(
//!         TypeDeclaration::object("Post")
//!             .implements("Node")
//!             .field(FieldDeclaration::new("id", FieldType::named("ID").required()))
//!             .field(FieldDeclaration::new("title", FieldType::named("String")))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let sdl = emit::sdl::emit_sdl(&schema);
//! assert!(sdl.contains("type Post implements Node {"));
//! ```

pub mod assembler;
pub mod builder;
pub mod checker;
pub mod checksum;
pub mod config;
pub mod declaration;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod loader;
pub mod names;
pub mod registry;
pub mod schema;
pub mod writer;

pub use assembler::{RootOperations, SchemaAssembler};
pub use builder::SchemaBuilder;
pub use checker::InterfaceChecker;
pub use checksum::Checksum;
pub use config::{BuildConfig, OutputConfig, OutputFormat, ScalarMapping, SourceConfig};
pub use declaration::{EnumValue, FieldDeclaration, FieldType, TypeDeclaration, TypeKind};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use emit::{ArtifactKind, EmitOptions};
pub use error::{Result, SchemaError};
pub use names::BuiltinScalar;
pub use registry::{InterfaceConformance, TypeRegistry};
pub use schema::{ResolvedField, Schema, SchemaType, TypeId, TypeTarget};
pub use writer::{Artifact, ArtifactSet, Drift, WriteOutcome, WriteReport};
