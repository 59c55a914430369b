//! SDL Emitter
//!
//! Prints the schema in GraphQL schema definition language, one definition
//! per type in registration order.

use crate::declaration::TypeKind;
use crate::schema::{ResolvedField, Schema, SchemaType};

const INDENT: &str = "  ";

/// Render the schema-description document
pub fn emit_sdl(schema: &Schema) -> String {
    let mut blocks = Vec::with_capacity(schema.len() + 1);

    if !schema.uses_conventional_roots() {
        blocks.push(emit_schema_block(schema));
    }
    for ty in schema.types() {
        blocks.push(emit_type(schema, ty));
    }

    let mut output = blocks.join("\n");
    if output.is_empty() {
        return output;
    }
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

fn emit_schema_block(schema: &Schema) -> String {
    let mut output = String::from("schema {\n");
    if let Some(query) = schema.query_root() {
        output.push_str(&format!("{}query: {}\n", INDENT, query.name()));
    }
    if let Some(mutation) = schema.mutation_root() {
        output.push_str(&format!("{}mutation: {}\n", INDENT, mutation.name()));
    }
    output.push_str("}\n");
    output
}

// =============================================================================
// Type Definitions
// =============================================================================

fn emit_type(schema: &Schema, ty: &SchemaType) -> String {
    let mut output = String::new();

    if let Some(description) = ty.description() {
        push_description(&mut output, description, "");
    }

    output.push_str(&format!("{} {}", ty.kind().keyword(), ty.name()));

    match ty.kind() {
        TypeKind::Object | TypeKind::Interface => {
            if !ty.interfaces().is_empty() {
                let names: Vec<_> = ty
                    .interfaces()
                    .iter()
                    .map(|id| schema.ty(*id).name())
                    .collect();
                output.push_str(&format!(" implements {}", names.join(" & ")));
            }
            output.push_str(" {\n");
            for field in ty.fields() {
                emit_field(&mut output, field);
            }
            output.push_str("}\n");
        }
        TypeKind::Enum => {
            output.push_str(" {\n");
            for value in ty.values() {
                if let Some(description) = &value.description {
                    push_description(&mut output, description, INDENT);
                }
                output.push_str(&format!("{}{}", INDENT, value.name));
                push_deprecation(&mut output, value.deprecated.as_deref());
                output.push('\n');
            }
            output.push_str("}\n");
        }
        TypeKind::Scalar => {
            output.push('\n');
        }
    }

    output
}

fn emit_field(output: &mut String, field: &ResolvedField) {
    if let Some(description) = field.description() {
        push_description(output, description, INDENT);
    }
    output.push_str(&format!("{}{}: {}", INDENT, field.name(), field.ty()));
    push_deprecation(output, field.deprecated());
    output.push('\n');
}

fn push_deprecation(output: &mut String, reason: Option<&str>) {
    match reason {
        Some("") => output.push_str(" @deprecated"),
        Some(reason) => output.push_str(&format!(
            " @deprecated(reason: {})",
            quote_string(reason)
        )),
        None => {}
    }
}

// =============================================================================
// Strings
// =============================================================================

/// Single-line descriptions print as strings, multi-line as block strings
fn push_description(output: &mut String, description: &str, indent: &str) {
    if description.contains('\n') {
        output.push_str(&format!("{}\"\"\"\n", indent));
        for line in description.lines() {
            if line.is_empty() {
                output.push('\n');
            } else {
                output.push_str(&format!("{}{}\n", indent, line.replace("\"\"\"", "\\\"\"\"")));
            }
        }
        output.push_str(&format!("{}\"\"\"\n", indent));
    } else {
        output.push_str(&format!("{}{}\n", indent, quote_string(description)));
    }
}

fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
