//! TypeScript Emitter
//!
//! Static typings for TypeScript consumers. Scalars go through a single
//! `Scalars` map so custom scalar mappings live in one place.

use std::collections::BTreeMap;

use crate::declaration::TypeKind;
use crate::names::BuiltinScalar;
use crate::schema::{ResolvedField, Schema, SchemaType, TypeTarget};

const HEADER: &str = "// Generated by codefirst-schema. Do not edit.\n";

const SCALAR_MAP: &str = "Scalars";

/// TypeScript type used for a custom scalar with no configured mapping
pub const UNMAPPED_SCALAR: &str = "unknown";

/// Render TypeScript typings. `scalars` maps custom scalar names to
/// TypeScript types.
pub fn emit_typescript(schema: &Schema, scalars: &BTreeMap<String, String>) -> String {
    let map = scalar_map_name(schema);
    let mut output = String::from(HEADER);
    output.push('\n');
    output.push_str(&emit_scalars(schema, scalars, &map));

    for ty in schema.types() {
        match ty.kind() {
            TypeKind::Object | TypeKind::Interface => {
                output.push('\n');
                output.push_str(&emit_interface(schema, ty, &map));
            }
            TypeKind::Enum => {
                output.push('\n');
                output.push_str(&emit_enum(ty));
            }
            // Reachable through `Scalars`
            TypeKind::Scalar => {}
        }
    }

    output
}

/// `Scalars`, or the first free name with trailing underscores when a schema
/// type already uses it
fn scalar_map_name(schema: &Schema) -> String {
    let mut name = String::from(SCALAR_MAP);
    while schema.get(&name).is_some() {
        name.push('_');
    }
    name
}

fn emit_scalars(schema: &Schema, scalars: &BTreeMap<String, String>, map: &str) -> String {
    let mut output = format!("export type {} = {{\n", map);

    for scalar in BuiltinScalar::ALL {
        let ts = match scalar {
            BuiltinScalar::Id | BuiltinScalar::String => "string",
            BuiltinScalar::Int | BuiltinScalar::Float => "number",
            BuiltinScalar::Boolean => "boolean",
        };
        output.push_str(&format!("  {}: {};\n", scalar, ts));
    }
    for ty in schema.types().filter(|t| t.kind() == TypeKind::Scalar) {
        let ts = scalars
            .get(ty.name())
            .map(String::as_str)
            .unwrap_or(UNMAPPED_SCALAR);
        output.push_str(&format!("  {}: {};\n", ty.name(), ts));
    }

    output.push_str("};\n");
    output
}

fn emit_interface(schema: &Schema, ty: &SchemaType, map: &str) -> String {
    let mut output = String::new();
    push_doc(&mut output, ty.description(), None, "");

    output.push_str(&format!("export interface {} {{\n", ty.name()));
    if ty.kind() == TypeKind::Object {
        output.push_str(&format!("  __typename: \"{}\";\n", ty.name()));
    }
    for field in ty.fields() {
        push_doc(&mut output, field.description(), field.deprecated(), "  ");
        output.push_str(&format!("  {}: {};\n", field.name(), field_type(schema, field, map)));
    }
    output.push_str("}\n");
    output
}

fn emit_enum(ty: &SchemaType) -> String {
    let mut output = String::new();
    push_doc(&mut output, ty.description(), None, "");

    let members: Vec<String> = ty
        .values()
        .iter()
        .map(|v| format!("\"{}\"", v.name))
        .collect();
    output.push_str(&format!("export type {} = {};\n", ty.name(), members.join(" | ")));
    output
}

fn field_type(schema: &Schema, field: &ResolvedField, map: &str) -> String {
    let named = match field.target() {
        TypeTarget::Builtin(scalar) => format!("{}[\"{}\"]", map, scalar),
        TypeTarget::Declared(id) => {
            let target = schema.ty(id);
            if target.kind() == TypeKind::Scalar {
                format!("{}[\"{}\"]", map, target.name())
            } else {
                target.name().to_string()
            }
        }
    };

    let ty = field.ty();
    let inner = if ty.is_list() {
        let item = nullable(named, ty.is_item_nullable());
        format!("Array<{}>", item)
    } else {
        named
    };
    nullable(inner, ty.is_nullable())
}

fn nullable(ts: String, is_nullable: bool) -> String {
    if is_nullable {
        format!("{} | null", ts)
    } else {
        ts
    }
}

fn push_doc(output: &mut String, description: Option<&str>, deprecated: Option<&str>, indent: &str) {
    let mut lines: Vec<String> = description
        .map(|d| d.lines().map(|l| l.replace("*/", "*\\/")).collect())
        .unwrap_or_default();
    if let Some(reason) = deprecated {
        let reason = reason.replace("*/", "*\\/");
        lines.push(format!("@deprecated {}", reason).trim_end().to_string());
    }

    match lines.as_slice() {
        [] => {}
        [line] => output.push_str(&format!("{}/** {} */\n", indent, line)),
        _ => {
            output.push_str(&format!("{}/**\n", indent));
            for line in &lines {
                if line.is_empty() {
                    output.push_str(&format!("{} *\n", indent));
                } else {
                    output.push_str(&format!("{} * {}\n", indent, line));
                }
            }
            output.push_str(&format!("{} */\n", indent));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::SchemaAssembler;
    use crate::declaration::{FieldDeclaration, FieldType, TypeDeclaration};
    use crate::registry::TypeRegistry;

    fn field(name: &str, ty: &str) -> FieldDeclaration {
        FieldDeclaration::new(name, FieldType::parse(ty).unwrap())
    }

    fn schema() -> Schema {
        let mut registry = TypeRegistry::new();
        registry
            .register_all([
                TypeDeclaration::scalar("DateTime"),
                TypeDeclaration::enumeration("Status").values(["DRAFT", "PUBLISHED"]).build(),
                TypeDeclaration::object("Post")
                    .description("A blog post")
                    .field(field("id", "ID!"))
                    .field(field("status", "Status!"))
                    .field(field("tags", "[String!]"))
                    .field(field("publishedAt", "DateTime").deprecated("use status"))
                    .build(),
            ])
            .unwrap();
        SchemaAssembler::new(&registry).assemble().unwrap()
    }

    #[test]
    fn test_typescript_output() {
        let mut scalars = BTreeMap::new();
        scalars.insert("DateTime".to_string(), "string".to_string());

        let expected = r#"// Generated by codefirst-schema. Do not edit.

export type Scalars = {
  ID: string;
  String: string;
  Int: number;
  Float: number;
  Boolean: boolean;
  DateTime: string;
};

export type Status = "DRAFT" | "PUBLISHED";

/** A blog post */
export interface Post {
  __typename: "Post";
  id: Scalars["ID"];
  status: Status;
  tags: Array<Scalars["String"]> | null;
  /** @deprecated use status */
  publishedAt: Scalars["DateTime"] | null;
}
"#;
        assert_eq!(emit_typescript(&schema(), &scalars), expected);
    }

    #[test]
    fn test_unmapped_custom_scalar() {
        let output = emit_typescript(&schema(), &BTreeMap::new());
        assert!(output.contains("  DateTime: unknown;\n"));
    }

    #[test]
    fn test_scalar_map_renamed_on_collision() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDeclaration::object("Scalars")
                    .field(field("count", "Int!"))
                    .build(),
            )
            .unwrap();
        let schema = SchemaAssembler::new(&registry).assemble().unwrap();
        let output = emit_typescript(&schema, &BTreeMap::new());

        assert!(output.contains("export type Scalars_ = {\n"));
        assert!(output.contains("export interface Scalars {\n"));
        assert!(output.contains("  count: Scalars_[\"Int\"];\n"));
        assert!(!output.contains("export type Scalars = "));
    }
}
