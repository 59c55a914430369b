//! End-to-end Pipeline Tests
//!
//! Declarations in, artifacts out: loading fixture directories, contract
//! failures, deterministic emission, and write/check against a temp dir.

use std::fs;
use std::path::Path;

use codefirst_schema::emit::{descriptor::emit_descriptor, sdl::emit_sdl};
use codefirst_schema::{
    ArtifactKind, ArtifactSet, BuildConfig, DiagnosticCode, Drift, EmitOptions, FieldDeclaration,
    FieldType, OutputConfig, OutputFormat, ScalarMapping, SchemaBuilder, SchemaError,
    TypeDeclaration, TypeKind,
};
use tempfile::tempdir;

fn fixtures_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").leak()
}

fn field(name: &str, ty: &str) -> FieldDeclaration {
    FieldDeclaration::new(name, FieldType::parse(ty).unwrap())
}

fn node() -> TypeDeclaration {
    TypeDeclaration::interface("Node").field(field("id", "ID!")).build()
}

// =============================================================================
// Fixture Directories
// =============================================================================

#[test]
fn test_blog_fixture_matches_golden_sdl() {
    let schema = SchemaBuilder::new()
        .load_dir(&fixtures_path().join("blog"))
        .unwrap()
        .build()
        .unwrap();

    let expected = fs::read_to_string(fixtures_path().join("blog.graphql")).unwrap();
    assert_eq!(emit_sdl(&schema), expected);
    assert!(schema.diagnostics().is_empty());
}

#[test]
fn test_blog_fixture_descriptor() {
    let schema = SchemaBuilder::new()
        .load_dir(&fixtures_path().join("blog"))
        .unwrap()
        .build()
        .unwrap();

    let text = emit_descriptor(&schema, OutputFormat::Pretty).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["roots"]["query"], "Query");
    assert_eq!(value["types"]["Node"]["implementors"], serde_json::json!(["User", "Post"]));
    assert_eq!(value["types"]["Post"]["fields"][4]["targetKind"], "scalar");
    assert_eq!(value["types"]["Role"]["values"][2]["deprecated"], "Use MEMBER");
}

#[test]
fn test_broken_fixture_suggests_name() {
    let result = SchemaBuilder::new()
        .load_dir(&fixtures_path().join("broken"))
        .unwrap()
        .build();

    match result {
        Err(SchemaError::UnresolvedTypeReference {
            type_name,
            field,
            target,
            suggestion,
        }) => {
            assert_eq!(type_name, "Post");
            assert_eq!(field, "author");
            assert_eq!(target, "Usr");
            assert_eq!(suggestion.as_deref(), Some("User"));
        }
        other => panic!("Expected UnresolvedTypeReference, got {:?}", other),
    }
}

// =============================================================================
// Contracts and Registration
// =============================================================================

#[test]
fn test_post_implements_node() {
    let schema = SchemaBuilder::new()
        .declare(node())
        .declare(
            TypeDeclaration::object("Post")
                .implements("Node")
                .field(field("id", "ID!"))
                .field(field("title", "String!"))
                .field(field("body", "String!"))
                .build(),
        )
        .build()
        .unwrap();

    let sdl = emit_sdl(&schema);
    assert!(sdl.contains(
        "type Post implements Node {\n  id: ID!\n  title: String!\n  body: String!\n}\n"
    ));
    assert!(sdl.find("interface Node").unwrap() < sdl.find("type Post").unwrap());
}

#[test]
fn test_missing_interface_field() {
    let result = SchemaBuilder::new()
        .declare(node())
        .declare(
            TypeDeclaration::object("Post")
                .implements("Node")
                .field(field("title", "String"))
                .build(),
        )
        .build();

    match result {
        Err(SchemaError::IncompatibleField {
            type_name,
            interface,
            field,
            ..
        }) => {
            assert_eq!(type_name, "Post");
            assert_eq!(interface, "Node");
            assert_eq!(field, "id");
        }
        other => panic!("Expected IncompatibleField, got {:?}", other),
    }
}

#[test]
fn test_structurally_equivalent_field_type() {
    let schema = SchemaBuilder::new()
        .declare(node())
        .declare(
            TypeDeclaration::interface("HasOwner")
                .field(field("owner", "Node"))
                .build(),
        )
        .declare(TypeDeclaration::object("Team").field(field("id", "ID!")).build())
        .declare(
            TypeDeclaration::object("Repo")
                .implements("HasOwner")
                .field(field("owner", "Team"))
                .build(),
        )
        .build()
        .unwrap();

    // Structural equivalence does not make Team an implementor
    assert!(schema.get("Node").unwrap().implementors().is_empty());
    assert!(emit_sdl(&schema).contains("type Team {\n"));
}

#[test]
fn test_nullable_cannot_satisfy_non_null() {
    let result = SchemaBuilder::new()
        .declare(node())
        .declare(
            TypeDeclaration::object("Post")
                .implements("Node")
                .field(field("id", "ID"))
                .build(),
        )
        .build();

    assert!(matches!(result, Err(SchemaError::IncompatibleField { .. })));
}

#[test]
fn test_unknown_interface() {
    let result = SchemaBuilder::new()
        .declare(
            TypeDeclaration::object("Post")
                .implements("Node")
                .field(field("id", "ID!"))
                .build(),
        )
        .build();

    match result {
        Err(SchemaError::MissingInterface { object, interface, found }) => {
            assert_eq!(object, "Post");
            assert_eq!(interface, "Node");
            assert_eq!(found, None);
        }
        other => panic!("Expected MissingInterface, got {:?}", other),
    }
}

#[test]
fn test_unresolved_author() {
    let result = SchemaBuilder::new()
        .declare(
            TypeDeclaration::object("Post")
                .field(field("author", "Author"))
                .build(),
        )
        .build();

    let err = result.unwrap_err();
    assert!(err.is_declaration_error());
    assert!(err.to_string().contains("'Post.author'"));
    assert!(err.to_string().contains("'Author'"));
}

#[test]
fn test_duplicate_type_names() {
    let result = SchemaBuilder::new()
        .declare(node())
        .declare(TypeDeclaration::enumeration("Node").values(["A"]).build())
        .build();

    match result {
        Err(SchemaError::DuplicateName {
            name,
            existing,
            attempted,
        }) => {
            assert_eq!(name, "Node");
            assert_eq!(existing, TypeKind::Interface);
            assert_eq!(attempted, TypeKind::Enum);
        }
        other => panic!("Expected DuplicateName, got {:?}", other),
    }
}

#[test]
fn test_interface_conflict_is_reported() {
    let schema = SchemaBuilder::new()
        .declare(
            TypeDeclaration::interface("Named")
                .field(field("label", "String"))
                .build(),
        )
        .declare(
            TypeDeclaration::interface("Labelled")
                .field(field("label", "String!"))
                .build(),
        )
        .declare(
            TypeDeclaration::object("Tag")
                .implements("Named")
                .implements("Labelled")
                .field(field("label", "String!"))
                .build(),
        )
        .build()
        .unwrap();

    let conflicts: Vec<_> = schema
        .diagnostics()
        .all()
        .iter()
        .filter(|d| d.code == DiagnosticCode::InterfaceFieldConflict)
        .collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].type_name, "Tag");
}

// =============================================================================
// Determinism and Artifacts
// =============================================================================

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = fixtures_path().join("blog");
    let options = EmitOptions::default();
    let output = OutputConfig {
        typescript_path: Some("schema.d.ts".into()),
        ..OutputConfig::default()
    };

    let first = SchemaBuilder::new().load_dir(&dir).unwrap().build().unwrap();
    let second = SchemaBuilder::new().load_dir(&dir).unwrap().build().unwrap();

    let first = ArtifactSet::render(&first, &output, &options).unwrap();
    let second = ArtifactSet::render(&second, &output, &options).unwrap();
    for (a, b) in first.artifacts().iter().zip(second.artifacts()) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.content, b.content);
    }
}

#[test]
fn test_build_then_check_round() {
    let out = tempdir().unwrap();
    let mut config = BuildConfig::default().rebase(out.path());
    config.source.dir = fixtures_path().join("blog");
    config.output.typescript_path = Some(out.path().join("generated/schema.d.ts"));
    config.scalars.push(ScalarMapping {
        name: "DateTime".to_string(),
        typescript: "string".to_string(),
    });

    let schema = SchemaBuilder::new()
        .load_dir(&config.source.dir)
        .unwrap()
        .roots(config.schema.clone())
        .build()
        .unwrap();
    let artifacts = ArtifactSet::render(&schema, &config.output, &config.emit_options()).unwrap();

    assert_eq!(artifacts.write().unwrap().written(), 3);
    assert!(artifacts.check().unwrap().is_empty());

    let typescript = fs::read_to_string(&artifacts.get(ArtifactKind::TypeScript).unwrap().path).unwrap();
    assert!(typescript.contains("  DateTime: string;\n"));
    assert!(typescript.contains("export type Role = \"ADMIN\" | \"MEMBER\" | \"GUEST\";\n"));

    // Hand edits show up as drift
    fs::write(&config.output.sdl_path, "type Query { hacked: Int }\n").unwrap();
    let drifts = artifacts.check().unwrap();
    assert_eq!(drifts.len(), 1);
    assert!(matches!(&drifts[0], Drift::Changed { .. }));

    // Rewriting restores only the edited file
    let report = artifacts.write().unwrap();
    assert_eq!(report.written(), 1);
    assert_eq!(report.unchanged(), 2);
}

#[test]
fn test_failed_build_writes_nothing() {
    let out = tempdir().unwrap();
    let config = BuildConfig::default().rebase(out.path());

    let result = SchemaBuilder::new()
        .load_dir(&fixtures_path().join("broken"))
        .and_then(|b| b.build());
    assert!(result.is_err());
    assert!(!config.output.sdl_path.exists());
    assert!(!config.output.descriptor_path.exists());
}
